use crate::core::tool::ToolDescriptor;
use crate::spec::openapi::{OpenApiDocument, Operation, Parameter};
use crate::spec::OperationSlots;
use crate::translate::{openapi_parameter_node, SchemaTranslator};

use super::{
    describe, merge_parameters, operation_name, CompileReport, ConversionError, HttpVerb,
    InputSchemaBuilder,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Compile every operation of an OpenAPI 3.x document.
pub fn compile_openapi(document: &OpenApiDocument) -> CompileReport {
    let base_url = document.base_url();
    let mut report = CompileReport::default();

    for (path, item) in &document.paths {
        let full_path = format!("{base_url}{path}");
        for (verb, operation) in HttpVerb::ALL.into_iter().zip(item.slots()) {
            let Some(operation) = operation else {
                continue;
            };
            let Some(name) = operation_name(operation.operation_id.as_deref(), verb, &full_path)
            else {
                continue;
            };

            match compile_operation(operation, &item.parameters, verb, &full_path, name.clone()) {
                Ok(tool) => report.push(tool),
                Err(error) => report.skip(&name, error),
            }
        }
    }

    tracing::info!(
        "compiled {} tools from OpenAPI document ({} skipped)",
        report.tools.len(),
        report.skipped.len()
    );
    report
}

fn compile_operation(
    operation: &Operation,
    shared: &[Parameter],
    verb: HttpVerb,
    full_path: &str,
    name: String,
) -> Result<ToolDescriptor, ConversionError> {
    let mut builder = InputSchemaBuilder::new(full_path, verb);

    for parameter in merge_parameters(shared, &operation.parameters, |p| {
        (p.name.as_str(), p.location.as_str())
    }) {
        builder.parameter(
            &parameter.name,
            openapi_parameter_node(parameter),
            parameter.required,
        );
    }

    if let Some(body) = &operation.request_body {
        let Some(media) = body.content.get(JSON_CONTENT_TYPE) else {
            return Err(ConversionError::MissingJsonBody {
                verb,
                path: full_path.to_string(),
            });
        };
        let node = media
            .schema
            .as_ref()
            .map(SchemaTranslator::to_schema_node)
            .unwrap_or_default();
        builder.body(node, body.required);
    }

    let description = describe(
        operation.summary.as_deref(),
        operation.description.as_deref(),
        verb,
        full_path,
    );
    Ok(builder.finish(name, description))
}
