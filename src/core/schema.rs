//! Canonical, dialect-agnostic schema tree.
//!
//! Both spec dialects translate into [`SchemaNode`]. The tree serializes to a
//! JSON-Schema-shaped object so it can be handed to a tool host unchanged.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

/// Shape of a schema fragment, carrying the structure that only some kinds have.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object {
        properties: IndexMap<String, SchemaNode>,
        required: Vec<String>,
    },
    Array {
        items: Option<Box<SchemaNode>>,
    },
    String,
    Number,
    Integer,
    Boolean,
}

impl SchemaKind {
    /// An object kind with no properties.
    pub fn empty_object() -> Self {
        Self::Object {
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Map a JSON-Schema type name onto a kind. Unknown names fall back to object.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "array" => Self::Array { items: None },
            "string" => Self::String,
            "number" => Self::Number,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            _ => Self::empty_object(),
        }
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// Author-declared constraints, copied verbatim from the source schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub description: Option<String>,
    pub format: Option<String>,
    pub pattern: Option<String>,
    pub enum_values: Option<Vec<Value>>,
    pub default: Option<Value>,
    pub const_value: Option<Value>,
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    /// Boolean in OpenAPI 3.0 / Swagger 2.0, numeric in OpenAPI 3.1.
    pub exclusive_minimum: Option<Value>,
    pub exclusive_maximum: Option<Value>,
    pub multiple_of: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
}

/// One node of the canonical schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub constraints: Constraints,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            constraints: Constraints::default(),
        }
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::empty_object())
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    /// A string leaf whose value is fixed at compile time.
    pub fn constant(value: impl Into<String>) -> Self {
        let mut node = Self::string();
        node.constraints.const_value = Some(Value::String(value.into()));
        node
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.constraints.description = Some(description.into());
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNode>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties()?.get(name)
    }

    pub fn required(&self) -> &[String] {
        match &self.kind {
            SchemaKind::Object { required, .. } => required,
            _ => &[],
        }
    }

    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Array { items } => items.as_deref(),
            _ => None,
        }
    }

    /// The compile-time constant of a string leaf, if this node is one.
    pub fn const_str(&self) -> Option<&str> {
        match (&self.kind, &self.constraints.const_value) {
            (SchemaKind::String, Some(Value::String(value))) => Some(value),
            _ => None,
        }
    }

    /// Render the node as a JSON Schema value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self::object()
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let c = &self.constraints;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;

        if let Some(description) = &c.description {
            map.serialize_entry("description", description)?;
        }
        if let Some(format) = &c.format {
            map.serialize_entry("format", format)?;
        }
        if let Some(value) = &c.const_value {
            map.serialize_entry("const", value)?;
        }
        if let Some(values) = &c.enum_values {
            map.serialize_entry("enum", values)?;
        }
        if let Some(default) = &c.default {
            map.serialize_entry("default", default)?;
        }
        if let Some(pattern) = &c.pattern {
            map.serialize_entry("pattern", pattern)?;
        }
        if let Some(minimum) = &c.minimum {
            map.serialize_entry("minimum", minimum)?;
        }
        if let Some(maximum) = &c.maximum {
            map.serialize_entry("maximum", maximum)?;
        }
        if let Some(value) = &c.exclusive_minimum {
            map.serialize_entry("exclusiveMinimum", value)?;
        }
        if let Some(value) = &c.exclusive_maximum {
            map.serialize_entry("exclusiveMaximum", value)?;
        }
        if let Some(value) = &c.multiple_of {
            map.serialize_entry("multipleOf", value)?;
        }
        if let Some(value) = c.min_length {
            map.serialize_entry("minLength", &value)?;
        }
        if let Some(value) = c.max_length {
            map.serialize_entry("maxLength", &value)?;
        }
        if let Some(value) = c.min_items {
            map.serialize_entry("minItems", &value)?;
        }
        if let Some(value) = c.max_items {
            map.serialize_entry("maxItems", &value)?;
        }
        if let Some(value) = c.unique_items {
            map.serialize_entry("uniqueItems", &value)?;
        }

        match &self.kind {
            SchemaKind::Object {
                properties,
                required,
            } => {
                if !properties.is_empty() {
                    map.serialize_entry("properties", properties)?;
                }
                if !required.is_empty() {
                    map.serialize_entry("required", required)?;
                }
            }
            SchemaKind::Array { items: Some(items) } => {
                map.serialize_entry("items", items)?;
            }
            _ => {}
        }

        map.end()
    }
}
