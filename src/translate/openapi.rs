use crate::core::schema::SchemaNode;
use crate::spec::facets::SchemaType;
use crate::spec::openapi::{Parameter, Schema};

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

/// A parameter's schema, or an untyped object when none is declared.
pub fn openapi_parameter_node(parameter: &Parameter) -> SchemaNode {
    let node = parameter
        .schema
        .as_ref()
        .map(SchemaTranslator::to_schema_node)
        .unwrap_or_default();
    with_parameter_description(node, parameter.description.as_deref())
}
