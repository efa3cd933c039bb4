//! Typed view of an OpenAPI 3.x document.
//!
//! Only the parts the compiler reads are modelled; everything else is ignored
//! during deserialization. Local `$ref`s are already expanded by the loader.

use indexmap::IndexMap;
use serde::Deserialize;

use super::facets::{required_names, Facets, SchemaType};
use super::OperationSlots;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl OpenApiDocument {
    /// Base URL taken from the first server, with server variables replaced by
    /// their defaults and any trailing slash trimmed. Empty when no server is
    /// declared.
    pub fn base_url(&self) -> String {
        let Some(server) = self.servers.first() else {
            return String::new();
        };

        let mut url = server.url.clone();
        for (name, variable) in &server.variables {
            url = url.replace(&format!("{{{name}}}"), &variable.default);
        }
        url.trim_end_matches('/').to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerVariable {
    #[serde(default)]
    pub default: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
}

impl OperationSlots for PathItem {
    type Operation = Operation;

    fn slots(&self) -> [Option<&Operation>; 5] {
        [
            self.get.as_ref(),
            self.post.as_ref(),
            self.put.as_ref(),
            self.delete.as_ref(),
            self.patch.as_ref(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,
    #[serde(flatten)]
    pub facets: Facets,
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    #[serde(default, deserialize_with = "required_names")]
    pub required: Vec<String>,
    pub items: Option<Box<Schema>>,
    #[serde(default)]
    pub all_of: Vec<Schema>,
}
