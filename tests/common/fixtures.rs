// tests/common/fixtures.rs
//! Petstore documents in both dialects. `{{BASE}}` is replaced with the mock
//! server address.

pub const PETSTORE_OPENAPI_YAML: &str = r##"
openapi: 3.0.3
info:
  title: Swagger Petstore
  version: 1.0.0
servers:
  - url: "{{BASE}}/v1"
paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      parameters:
        - name: limit
          in: query
          description: How many items to return at one time (max 100)
          required: false
          schema:
            type: integer
            format: int32
            maximum: 100
      responses:
        "200":
          description: A paged array of pets
    post:
      operationId: createPets
      summary: Create a pet
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: "#/components/schemas/Pet"
      responses:
        "201":
          description: Null response
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        required: true
        description: The id of the pet to retrieve
        schema:
          type: string
    get:
      operationId: showPetById
      summary: Info for a specific pet
      responses:
        "200":
          description: Expected response to a valid request
    delete:
      operationId: deletePet
      responses:
        "204":
          description: Deleted
  /pets/{petId}/photo:
    put:
      operationId: uploadPhoto
      requestBody:
        content:
          image/png:
            schema:
              type: string
              format: binary
      responses:
        "200":
          description: ok
components:
  schemas:
    Pet:
      type: object
      required:
        - id
        - name
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
        tag:
          type: string
        status:
          type: string
          enum: [available, pending, sold]
"##;

pub const PETSTORE_SWAGGER_JSON: &str = r##"{
  "swagger": "2.0",
  "info": { "title": "Swagger Petstore", "version": "1.0.0" },
  "host": "{{HOST}}",
  "basePath": "/v1",
  "schemes": ["http"],
  "paths": {
    "/pets": {
      "get": {
        "operationId": "listPets",
        "summary": "List all pets",
        "parameters": [
          { "name": "limit", "in": "query", "type": "integer", "format": "int32", "maximum": 100 }
        ],
        "responses": { "200": { "description": "A paged array of pets" } }
      },
      "post": {
        "operationId": "createPets",
        "summary": "Create a pet",
        "parameters": [
          { "name": "pet", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Pet" } }
        ],
        "responses": { "201": { "description": "Null response" } }
      }
    },
    "/pets/{petId}": {
      "get": {
        "operationId": "showPetById",
        "summary": "Info for a specific pet",
        "parameters": [
          { "name": "petId", "in": "path", "required": true, "type": "string",
            "description": "The id of the pet to retrieve" }
        ],
        "responses": { "200": { "description": "Expected response to a valid request" } }
      }
    }
  },
  "definitions": {
    "Pet": {
      "type": "object",
      "required": ["id", "name"],
      "properties": {
        "id": { "type": "integer", "format": "int64" },
        "name": { "type": "string" },
        "tag": { "type": "string" }
      }
    }
  }
}"##;

/// The OpenAPI fixture pointed at `base` (e.g. `http://127.0.0.1:1234`).
pub fn openapi_for(base: &str) -> String {
    PETSTORE_OPENAPI_YAML.replace("{{BASE}}", base)
}

/// The Swagger fixture pointed at `host` (e.g. `127.0.0.1:1234`).
pub fn swagger_for(host: &str) -> String {
    PETSTORE_SWAGGER_JSON.replace("{{HOST}}", host)
}
