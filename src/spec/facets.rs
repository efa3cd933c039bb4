//! Schema keywords shared verbatim by both dialects.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// The `type` keyword: a single name, or a list of names (OpenAPI 3.1 and
/// some Swagger documents).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// The first declared type that is not `null`.
    pub fn primary(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name.as_str()),
            Self::Multiple(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null"),
        }
    }
}

/// Constraint keywords copied field-for-field into the canonical tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub format: Option<String>,
    pub description: Option<String>,
    pub pattern: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    #[serde(rename = "const")]
    pub const_value: Option<Value>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Value>,
    pub exclusive_maximum: Option<Value>,
    pub multiple_of: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
}

/// `required` on a schema is a list of names. Legacy documents sometimes put a
/// boolean there; that carries no property names, so it reads as empty.
pub(crate) fn required_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Required {
        Names(Vec<String>),
        Flag(#[allow(dead_code)] bool),
    }

    Ok(match Option::<Required>::deserialize(deserializer)? {
        Some(Required::Names(names)) => names,
        Some(Required::Flag(_)) | None => Vec::new(),
    })
}
