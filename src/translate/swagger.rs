use crate::core::schema::{Constraints, SchemaKind, SchemaNode};
use crate::spec::facets::SchemaType;
use crate::spec::swagger::{Parameter, Schema, SimpleSchema};

use super::{structured_node, with_parameter_description, SchemaParts, SchemaTranslator};

impl SchemaTranslator for Schema {
    fn to_schema_node(&self) -> SchemaNode {
        structured_node(SchemaParts {
            type_name: self.schema_type.as_ref().and_then(SchemaType::primary),
            facets: &self.facets,
            properties: &self.properties,
            required: &self.required,
            items: self.items.as_deref(),
            all_of: &self.all_of,
        })
    }
}

impl SchemaTranslator for SimpleSchema {
    fn to_schema_node(&self) -> SchemaNode {
        let kind = match SchemaKind::from_type_name(self.schema_type.as_deref().unwrap_or("object")) {
            SchemaKind::Array { .. } => SchemaKind::Array {
                items: self.items.as_deref().map(|items| Box::new(items.to_schema_node())),
            },
            other => other,
        };
        SchemaNode {
            kind,
            constraints: Constraints::from(&self.facets),
        }
    }
}

/// Body parameters translate their `schema`; every other location is
/// described inline.
pub fn swagger_parameter_node(parameter: &Parameter) -> SchemaNode {
    let node = if parameter.is_body() {
        parameter
            .schema
            .as_ref()
            .map(SchemaTranslator::to_schema_node)
            .unwrap_or_default()
    } else {
        parameter.simple.to_schema_node()
    };
    with_parameter_description(node, parameter.description())
}
