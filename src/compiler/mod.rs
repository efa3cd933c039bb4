//! Operation → tool descriptor compilation.
//!
//! Every operation with a non-empty id becomes one [`ToolDescriptor`] whose
//! input schema carries two compile-time constants (`endpoint`, `method`),
//! the translated parameters, and an optional `body` property.
//!
//! Paths are compiled in document order and verbs in the fixed order GET,
//! POST, PUT, DELETE, PATCH. Operation-id collisions are not rejected: the
//! last compiled descriptor wins.

use std::fmt;

use indexmap::IndexMap;

use crate::core::schema::{SchemaKind, SchemaNode};
use crate::core::tool::{ToolDescriptor, ToolSet, BODY_PROPERTY, ENDPOINT_PROPERTY, METHOD_PROPERTY};

mod openapi;
mod swagger;

pub use openapi::compile_openapi;
pub use swagger::compile_swagger;

/// HTTP verbs that produce tools, in compile priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Delete,
        HttpVerb::Patch,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single operation could not be turned into a tool. Compilation of the
/// rest of the document continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("request body for {verb} {path} declares no application/json content")]
    MissingJsonBody { verb: HttpVerb, path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOperation {
    pub operation_id: String,
    pub error: ConversionError,
}

/// Output of compiling one document.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub tools: ToolSet,
    pub skipped: Vec<SkippedOperation>,
}

impl CompileReport {
    fn push(&mut self, tool: ToolDescriptor) {
        let name = tool.name.clone();
        if let Some(previous) = self.tools.insert(tool) {
            tracing::warn!(
                "operation id '{name}' compiled more than once; replacing {} {}",
                previous.method().unwrap_or("?"),
                previous.endpoint().unwrap_or("?")
            );
        }
    }

    fn skip(&mut self, operation_id: &str, error: ConversionError) {
        tracing::warn!("skipping operation '{operation_id}': {error}");
        self.skipped.push(SkippedOperation {
            operation_id: operation_id.to_string(),
            error,
        });
    }
}

/// The operation id when it is present and non-empty.
fn operation_name(operation_id: Option<&str>, verb: HttpVerb, full_path: &str) -> Option<String> {
    match operation_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => Some(id.to_string()),
        None => {
            tracing::debug!("no operation id for {verb} {full_path}; not compiled");
            None
        }
    }
}

/// Summary, then description, then `"<VERB> <path>"`.
fn describe(summary: Option<&str>, description: Option<&str>, verb: HttpVerb, full_path: &str) -> String {
    summary
        .filter(|s| !s.is_empty())
        .or_else(|| description.filter(|d| !d.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{verb} {full_path}"))
}

/// Path-level parameters overridden by operation-level ones with the same
/// name and location. Order: surviving path-level first, then operation-level.
fn merge_parameters<'a, P>(
    path_level: &'a [P],
    operation_level: &'a [P],
    key: impl Fn(&P) -> (&str, &str),
) -> Vec<&'a P> {
    let mut merged: Vec<&P> = path_level
        .iter()
        .filter(|shared| {
            !operation_level
                .iter()
                .any(|own| key(own) == key(shared))
        })
        .collect();
    merged.extend(operation_level.iter());
    merged
}

/// Accumulates the property bag of one descriptor.
struct InputSchemaBuilder {
    properties: IndexMap<String, SchemaNode>,
    required: Vec<String>,
}

impl InputSchemaBuilder {
    fn new(full_path: &str, verb: HttpVerb) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(ENDPOINT_PROPERTY.to_string(), SchemaNode::constant(full_path));
        properties.insert(METHOD_PROPERTY.to_string(), SchemaNode::constant(verb.as_str()));
        Self {
            properties,
            required: Vec::new(),
        }
    }

    /// Reserved names are never taken from parameters.
    fn parameter(&mut self, name: &str, node: SchemaNode, required: bool) {
        if matches!(name, ENDPOINT_PROPERTY | METHOD_PROPERTY | BODY_PROPERTY) {
            tracing::warn!("parameter '{name}' collides with a reserved tool property; dropped");
            return;
        }
        self.properties.insert(name.to_string(), node);
        if required {
            self.require(name);
        }
    }

    fn body(&mut self, node: SchemaNode, required: bool) {
        self.properties.insert(BODY_PROPERTY.to_string(), node);
        if required {
            self.require(BODY_PROPERTY);
        }
    }

    fn require(&mut self, name: &str) {
        if !self.required.iter().any(|existing| existing == name) {
            self.required.push(name.to_string());
        }
    }

    fn finish(self, name: String, description: String) -> ToolDescriptor {
        ToolDescriptor {
            name,
            description,
            input_schema: SchemaNode::new(SchemaKind::Object {
                properties: self.properties,
                required: self.required,
            }),
        }
    }
}

#[cfg(test)]
mod tests;
