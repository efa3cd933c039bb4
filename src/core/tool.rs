use indexmap::IndexMap;
use serde::Serialize;

use crate::core::schema::SchemaNode;
use crate::mcp::types::Tool;

/// Reserved property holding the full endpoint template.
pub const ENDPOINT_PROPERTY: &str = "endpoint";
/// Reserved property holding the HTTP verb.
pub const METHOD_PROPERTY: &str = "method";
/// Reserved property carrying the JSON request payload.
pub const BODY_PROPERTY: &str = "body";

/// MCP-compatible tool descriptor compiled from one API operation.
///
/// `input_schema` is always an object node whose `endpoint` and `method`
/// properties are string constants fixed at compile time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: SchemaNode,
}

impl ToolDescriptor {
    /// The compiled endpoint template, e.g. `https://api.example.com/users/{id}`.
    pub fn endpoint(&self) -> Option<&str> {
        self.input_schema
            .property(ENDPOINT_PROPERTY)
            .and_then(SchemaNode::const_str)
    }

    /// The compiled HTTP verb.
    pub fn method(&self) -> Option<&str> {
        self.input_schema
            .property(METHOD_PROPERTY)
            .and_then(SchemaNode::const_str)
    }

    pub fn to_mcp_tool(&self) -> Tool {
        Tool {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.to_json(),
        }
    }
}

/// Compiled descriptors keyed by name, in compile order.
///
/// Inserting a name that already exists replaces the earlier descriptor and
/// moves the name to the end, so the last compiled operation wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolSet {
    tools: IndexMap<String, ToolDescriptor>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it displaced, if any.
    pub fn insert(&mut self, descriptor: ToolDescriptor) -> Option<ToolDescriptor> {
        let previous = self.tools.shift_remove(&descriptor.name);
        self.tools.insert(descriptor.name.clone(), descriptor);
        previous
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a ToolSet {
    type Item = &'a ToolDescriptor;
    type IntoIter = indexmap::map::Values<'a, String, ToolDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.tools.values()
    }
}
