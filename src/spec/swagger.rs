//! Typed view of a Swagger 2.0 document.

use indexmap::IndexMap;
use serde::Deserialize;

use super::facets::{required_names, Facets, SchemaType};
use super::OperationSlots;

/// Scheme used when the document declares a host but no schemes.
pub const DEFAULT_SCHEME: &str = "https";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwaggerDocument {
    pub swagger: String,
    pub host: Option<String>,
    pub base_path: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl SwaggerDocument {
    /// `scheme://host + basePath` when a host is declared, otherwise
    /// `basePath` alone. A trailing slash is trimmed.
    pub fn base_url(&self) -> String {
        let base_path = self.base_path.as_deref().unwrap_or_default();
        let url = match self.host.as_deref().filter(|host| !host.is_empty()) {
            Some(host) => {
                let scheme = self
                    .schemes
                    .first()
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_SCHEME);
                format!("{scheme}://{host}{base_path}")
            }
            None => base_path.to_string(),
        };
        url.trim_end_matches('/').to_string()
    }
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
}

/// A Swagger parameter. Body parameters carry `schema`; every other location
/// describes its type inline through the flattened simple schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub simple: SimpleSchema,
}

impl Parameter {
    pub fn is_body(&self) -> bool {
        self.location == "body"
    }

    pub fn description(&self) -> Option<&str> {
        self.simple.facets.description.as_deref()
    }
}

/// Inline type description used by non-body parameters and their `items`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub items: Option<Box<SimpleSchema>>,
    #[serde(flatten)]
    pub facets: Facets,
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
