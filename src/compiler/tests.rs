use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::compiler::{compile_openapi, compile_swagger, ConversionError, HttpVerb};
use crate::spec::openapi::OpenApiDocument;
use crate::spec::swagger::SwaggerDocument;

fn openapi(value: Value) -> OpenApiDocument {
    serde_json::from_value(value).expect("openapi document should deserialize")
}

fn swagger(value: Value) -> SwaggerDocument {
    serde_json::from_value(value).expect("swagger document should deserialize")
}

#[test]
fn openapi_emits_one_tool_per_identified_operation() {
    let doc = openapi(json!({
        "openapi": "3.0.3",
        "servers": [{ "url": "https://api.example.com/v1" }],
        "paths": {
            "/pets": {
                "patch": { "operationId": "patchPets" },
                "get": { "operationId": "listPets" },
                "post": { "operationId": "createPet" },
                "head": { "operationId": "headPets" }
            },
            "/pets/{id}": {
                "put": { "operationId": "replacePet" },
                "delete": { "operationId": "deletePet" },
                "get": { "summary": "no id, no tool" }
            }
        }
    }));

    let report = compile_openapi(&doc);
    let names: Vec<&str> = report.tools.names().collect();
    assert_eq!(
        names,
        vec!["listPets", "createPet", "patchPets", "replacePet", "deletePet"]
    );
    assert!(report.skipped.is_empty());
}

#[test]
fn openapi_descriptor_has_constants_parameters_and_body() {
    let doc = openapi(json!({
        "openapi": "3.0.3",
        "servers": [{ "url": "https://api.example.com/v1/" }],
        "paths": {
            "/users/{id}": {
                "put": {
                    "operationId": "updateUser",
                    "summary": "Update a user",
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                        { "name": "dryRun", "in": "query", "schema": { "type": "boolean" } }
                    ],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": { "name": { "type": "string", "maxLength": 20 } }
                        }}}
                    }
                }
            }
        }
    }));

    let report = compile_openapi(&doc);
    let tool = report.tools.get("updateUser").unwrap();
    assert_eq!(
        serde_json::to_value(tool).unwrap(),
        json!({
            "name": "updateUser",
            "description": "Update a user",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "endpoint": { "type": "string", "const": "https://api.example.com/v1/users/{id}" },
                    "method": { "type": "string", "const": "PUT" },
                    "id": { "type": "string" },
                    "dryRun": { "type": "boolean" },
                    "body": {
                        "type": "object",
                        "properties": { "name": { "type": "string", "maxLength": 20 } }
                    }
                },
                "required": ["id", "body"]
            }
        })
    );
}

#[test]
fn openapi_non_json_body_skips_only_that_operation() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "servers": [{ "url": "https://files.example.com" }],
        "paths": {
            "/upload": {
                "post": {
                    "operationId": "upload",
                    "requestBody": { "content": { "multipart/form-data": { "schema": { "type": "object" } } } }
                },
                "get": { "operationId": "listUploads" }
            }
        }
    }));

    let report = compile_openapi(&doc);
    assert_eq!(report.tools.names().collect::<Vec<_>>(), vec!["listUploads"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].operation_id, "upload");
    assert_eq!(
        report.skipped[0].error,
        ConversionError::MissingJsonBody {
            verb: HttpVerb::Post,
            path: "https://files.example.com/upload".to_string(),
        }
    );
}

#[test]
fn description_falls_back_to_description_then_verb_and_path() {
    let doc = openapi(json!({
        "openapi": "3.1.0",
        "servers": [{ "url": "https://x.test" }],
        "paths": {
            "/a": {
                "get": { "operationId": "a1", "summary": "", "description": "Long text" },
                "post": { "operationId": "a2" }
            }
        }
    }));

    let report = compile_openapi(&doc);
    assert_eq!(report.tools.get("a1").unwrap().description, "Long text");
    assert_eq!(report.tools.get("a2").unwrap().description, "POST https://x.test/a");
}

#[test]
fn openapi_server_variables_use_defaults() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "servers": [{
            "url": "https://{region}.example.com/{version}",
            "variables": {
                "region": { "default": "eu" },
                "version": { "default": "v2" }
            }
        }],
        "paths": { "/ping": { "get": { "operationId": "ping" } } }
    }));

    let report = compile_openapi(&doc);
    assert_eq!(
        report.tools.get("ping").unwrap().endpoint(),
        Some("https://eu.example.com/v2/ping")
    );
}

#[test]
fn openapi_without_servers_uses_bare_path() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "paths": { "/ping": { "get": { "operationId": "ping" } } }
    }));
    assert_eq!(compile_openapi(&doc).tools.get("ping").unwrap().endpoint(), Some("/ping"));
}

#[test]
fn path_level_parameters_apply_and_can_be_overridden() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "servers": [{ "url": "https://x.test" }],
        "paths": {
            "/orgs/{org}/repos": {
                "parameters": [
                    { "name": "org", "in": "path", "required": true, "schema": { "type": "string" } },
                    { "name": "page", "in": "query", "schema": { "type": "integer" } }
                ],
                "get": {
                    "operationId": "listRepos",
                    "parameters": [
                        { "name": "page", "in": "query", "schema": { "type": "integer", "minimum": 1 } }
                    ]
                }
            }
        }
    }));

    let report = compile_openapi(&doc);
    let schema = &report.tools.get("listRepos").unwrap().input_schema;
    assert_eq!(schema.property("org").unwrap().type_name(), "string");
    assert_eq!(schema.property("page").unwrap().to_json(), json!({ "type": "integer", "minimum": 1 }));
    assert_eq!(schema.required(), ["org".to_string()]);
}

#[test]
fn reserved_parameter_names_cannot_shadow_constants() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "servers": [{ "url": "https://x.test" }],
        "paths": {
            "/search": {
                "get": {
                    "operationId": "search",
                    "parameters": [
                        { "name": "method", "in": "query", "required": true, "schema": { "type": "string" } },
                        { "name": "endpoint", "in": "query", "schema": { "type": "string" } }
                    ]
                }
            }
        }
    }));

    let report = compile_openapi(&doc);
    let tool = report.tools.get("search").unwrap();
    assert_eq!(tool.method(), Some("GET"));
    assert_eq!(tool.endpoint(), Some("https://x.test/search"));
    assert!(tool.input_schema.required().is_empty());
}

#[test]
fn duplicate_operation_ids_keep_the_last_compiled() {
    let doc = openapi(json!({
        "openapi": "3.0.0",
        "servers": [{ "url": "https://x.test" }],
        "paths": {
            "/first": { "get": { "operationId": "dup", "summary": "first" } },
            "/second": { "post": { "operationId": "dup", "summary": "second" } }
        }
    }));

    let report = compile_openapi(&doc);
    assert_eq!(report.tools.len(), 1);
    let tool = report.tools.get("dup").unwrap();
    assert_eq!(tool.description, "second");
    assert_eq!(tool.method(), Some("POST"));
    assert_eq!(tool.endpoint(), Some("https://x.test/second"));
}

#[test]
fn swagger_base_url_defaults_scheme_to_https() {
    let doc = swagger(json!({
        "swagger": "2.0",
        "host": "petstore.example.com",
        "basePath": "/v2",
        "paths": { "/pets": { "get": { "operationId": "listPets" } } }
    }));

    let report = compile_swagger(&doc);
    assert_eq!(
        report.tools.get("listPets").unwrap().endpoint(),
        Some("https://petstore.example.com/v2/pets")
    );
}

#[test]
fn swagger_base_url_uses_first_declared_scheme() {
    let doc = swagger(json!({
        "swagger": "2.0",
        "host": "localhost:8080",
        "schemes": ["http", "https"],
        "paths": { "/pets": { "get": { "operationId": "listPets" } } }
    }));

    assert_eq!(
        compile_swagger(&doc).tools.get("listPets").unwrap().endpoint(),
        Some("http://localhost:8080/pets")
    );
}

#[test]
fn swagger_without_host_uses_base_path_alone() {
    let doc = swagger(json!({
        "swagger": "2.0",
        "basePath": "/api",
        "schemes": ["http"],
        "paths": { "/pets": { "get": { "operationId": "listPets" } } }
    }));

    assert_eq!(
        compile_swagger(&doc).tools.get("listPets").unwrap().endpoint(),
        Some("/api/pets")
    );
}

#[test]
fn swagger_body_parameter_becomes_body_property() {
    let doc = swagger(json!({
        "swagger": "2.0",
        "host": "x.test",
        "paths": {
            "/pets/{petId}": {
                "put": {
                    "operationId": "updatePet",
                    "description": "Replace a pet",
                    "parameters": [
                        { "name": "petId", "in": "path", "required": true, "type": "integer", "format": "int64" },
                        { "name": "pet", "in": "body", "required": true, "schema": {
                            "type": "object",
                            "required": ["name"],
                            "properties": { "name": { "type": "string" } }
                        }}
                    ]
                }
            }
        }
    }));

    let report = compile_swagger(&doc);
    let tool = report.tools.get("updatePet").unwrap();
    let schema = &tool.input_schema;

    assert_eq!(tool.description, "Replace a pet");
    assert!(schema.property("pet").is_none());
    assert_eq!(
        schema.property("petId").unwrap().to_json(),
        json!({ "type": "integer", "format": "int64" })
    );
    assert_eq!(
        schema.property("body").unwrap().to_json(),
        json!({
            "type": "object",
            "properties": { "name": { "type": "string" } },
            "required": ["name"]
        })
    );
    assert_eq!(schema.required(), ["petId".to_string(), "body".to_string()]);
}
