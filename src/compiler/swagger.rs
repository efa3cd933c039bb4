use crate::core::tool::ToolDescriptor;
use crate::spec::swagger::{Operation, Parameter, SwaggerDocument};
use crate::spec::OperationSlots;
use crate::translate::swagger_parameter_node;

use super::{describe, merge_parameters, operation_name, CompileReport, HttpVerb, InputSchemaBuilder};

/// Compile every operation of a Swagger 2.0 document.
pub fn compile_swagger(document: &SwaggerDocument) -> CompileReport {
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
            report.push(compile_operation(operation, &item.parameters, verb, &full_path, name));
        }
    }

    tracing::info!(
        "compiled {} tools from Swagger document ({} skipped)",
        report.tools.len(),
        report.skipped.len()
    );
    report
}

/// The single `in: body` parameter becomes the synthetic `body` property;
/// every other parameter keeps its own name.
fn compile_operation(
    operation: &Operation,
    shared: &[Parameter],
    verb: HttpVerb,
    full_path: &str,
    name: String,
) -> ToolDescriptor {
    let mut builder = InputSchemaBuilder::new(full_path, verb);

    for parameter in merge_parameters(shared, &operation.parameters, |p| {
        (p.name.as_str(), p.location.as_str())
    }) {
        let node = swagger_parameter_node(parameter);
        if parameter.is_body() {
            builder.body(node, parameter.required);
        } else {
            builder.parameter(&parameter.name, node, parameter.required);
        }
    }

    let description = describe(
        operation.summary.as_deref(),
        operation.description.as_deref(),
        verb,
        full_path,
    );
    builder.finish(name, description)
}
