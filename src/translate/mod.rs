//! Dialect schemas → canonical [`SchemaNode`] trees.
//!
//! Each dialect's native schema type implements [`SchemaTranslator`]. The
//! translation is a structural match: objects recurse into their properties,
//! arrays into their items, and primitives copy their constraints verbatim.

use indexmap::IndexMap;

use crate::core::schema::{Constraints, SchemaKind, SchemaNode};
use crate::spec::facets::Facets;

mod openapi;
mod swagger;

pub use openapi::openapi_parameter_node;
pub use swagger::swagger_parameter_node;

/// Conversion of one dialect schema into the canonical tree.
pub trait SchemaTranslator {
    fn to_schema_node(&self) -> SchemaNode;
}

impl From<&Facets> for Constraints {
    fn from(facets: &Facets) -> Self {
        Self {
            description: facets.description.clone(),
            format: facets.format.clone(),
            pattern: facets.pattern.clone(),
            enum_values: facets.enum_values.clone(),
            default: facets.default.clone(),
            const_value: facets.const_value.clone(),
            minimum: facets.minimum.clone(),
            maximum: facets.maximum.clone(),
            exclusive_minimum: facets.exclusive_minimum.clone(),
            exclusive_maximum: facets.exclusive_maximum.clone(),
            multiple_of: facets.multiple_of.clone(),
            min_length: facets.min_length,
            max_length: facets.max_length,
            min_items: facets.min_items,
            max_items: facets.max_items,
            unique_items: facets.unique_items,
        }
    }
}

/// Parts of a full (object-capable) schema, borrowed from either dialect.
pub(crate) struct SchemaParts<'a, S> {
    pub type_name: Option<&'a str>,
    pub facets: &'a Facets,
    pub properties: &'a IndexMap<String, S>,
    pub required: &'a [String],
    pub items: Option<&'a S>,
    pub all_of: &'a [S],
}

/// Build a node from schema parts. A missing type means object.
pub(crate) fn structured_node<S: SchemaTranslator>(parts: SchemaParts<'_, S>) -> SchemaNode {
    let kind = match SchemaKind::from_type_name(parts.type_name.unwrap_or("object")) {
        SchemaKind::Object { .. } => object_kind(parts.properties, parts.required, parts.all_of),
        SchemaKind::Array { .. } => SchemaKind::Array {
            items: parts.items.map(|items| Box::new(items.to_schema_node())),
        },
        primitive => primitive,
    };

    SchemaNode {
        kind,
        constraints: Constraints::from(parts.facets),
    }
}

/// Object properties in declaration order. `allOf` members are merged in
/// after the schema's own properties; later members win on a name clash.
fn object_kind<S: SchemaTranslator>(
    properties: &IndexMap<String, S>,
    required: &[String],
    all_of: &[S],
) -> SchemaKind {
    let mut merged: IndexMap<String, SchemaNode> = properties
        .iter()
        .map(|(name, schema)| (name.clone(), schema.to_schema_node()))
        .collect();
    let mut merged_required: Vec<String> = Vec::new();
    push_unique(&mut merged_required, required);

    for member in all_of {
        if let SchemaKind::Object {
            properties,
            required,
        } = member.to_schema_node().kind
        {
            merged.extend(properties);
            push_unique(&mut merged_required, &required);
        }
    }

    SchemaKind::Object {
        properties: merged,
        required: merged_required,
    }
}

fn push_unique(into: &mut Vec<String>, names: &[String]) {
    for name in names {
        if !into.contains(name) {
            into.push(name.clone());
        }
    }
}

/// Replace the node's description with a parameter-level one, if present.
pub(crate) fn with_parameter_description(mut node: SchemaNode, description: Option<&str>) -> SchemaNode {
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        node.constraints.description = Some(description.to_string());
    }
    node
}
