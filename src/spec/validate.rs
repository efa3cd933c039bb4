//! Validation of a reference-expanded document.
//!
//! The document is checked against the published meta-schema for its version
//! (bundled under `schemas/`), then against the few rules a meta-schema
//! cannot state. Every problem is collected so the caller can report them all
//! at once. Locations are JSON pointers into the document.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::{Map, Value};

use super::Dialect;

const SWAGGER_2_0_SCHEMA: &str = include_str!("schemas/swagger-2.0.json");
const OPENAPI_3_0_SCHEMA: &str = include_str!("schemas/openapi-3.0.json");
const OPENAPI_3_1_SCHEMA: &str = include_str!("schemas/openapi-3.1.json");

static SWAGGER_2_0: OnceLock<Result<Validator, String>> = OnceLock::new();
static OPENAPI_3_0: OnceLock<Result<Validator, String>> = OnceLock::new();
static OPENAPI_3_1: OnceLock<Result<Validator, String>> = OnceLock::new();

const VERBS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Which bundled meta-schema a document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSchema {
    Swagger20,
    OpenApi30,
    OpenApi31,
}

impl MetaSchema {
    /// `3.0.x` documents use the 3.0 schema; any later 3.x uses the 3.1 one.
    pub fn for_document(dialect: Dialect, document: &Value) -> Self {
        match dialect {
            Dialect::Swagger2 => Self::Swagger20,
            Dialect::OpenApi3 => {
                let version = document.get("openapi").and_then(Value::as_str).unwrap_or("");
                if version.trim() == "3.0" || version.trim().starts_with("3.0.") {
                    Self::OpenApi30
                } else {
                    Self::OpenApi31
                }
            }
        }
    }

    fn validator(self) -> Result<&'static Validator, String> {
        let (cell, source) = match self {
            Self::Swagger20 => (&SWAGGER_2_0, SWAGGER_2_0_SCHEMA),
            Self::OpenApi30 => (&OPENAPI_3_0, OPENAPI_3_0_SCHEMA),
            Self::OpenApi31 => (&OPENAPI_3_1, OPENAPI_3_1_SCHEMA),
        };
        cell.get_or_init(|| compile_meta_schema(source))
            .as_ref()
            .map_err(|e| format!("{self:?} meta-schema unavailable: {e}"))
    }
}

fn compile_meta_schema(source: &str) -> Result<Validator, String> {
    let schema: Value = serde_json::from_str(source).map_err(|e| e.to_string())?;
    jsonschema::validator_for(&schema).map_err(|e| e.to_string())
}

pub fn validate(dialect: Dialect, document: &Value) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    match MetaSchema::for_document(dialect, document).validator() {
        Ok(validator) => errors.extend(validator.iter_errors(document).map(|e| {
            let location = e.instance_path.to_string();
            let location = if location.is_empty() { "/".to_string() } else { location };
            format!("{location}: {e}")
        })),
        Err(e) => errors.push(e),
    }

    if let Some(paths) = document.get("paths").and_then(Value::as_object) {
        validate_paths(dialect, paths, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Rules that hold across a parameter list rather than inside one object.
fn validate_paths(dialect: Dialect, paths: &Map<String, Value>, errors: &mut Vec<String>) {
    for (path, item) in paths {
        let location = format!("/paths/{}", escape_pointer(path));
        let Some(item) = item.as_object() else {
            continue;
        };

        if let Some(parameters) = item.get("parameters").and_then(Value::as_array) {
            validate_parameters(dialect, parameters, &format!("{location}/parameters"), errors);
        }

        for verb in VERBS {
            let Some(parameters) = item
                .get(verb)
                .and_then(|operation| operation.get("parameters"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            validate_parameters(dialect, parameters, &format!("{location}/{verb}/parameters"), errors);
        }
    }
}

fn validate_parameters(dialect: Dialect, parameters: &[Value], location: &str, errors: &mut Vec<String>) {
    let mut body_count = 0usize;
    for (index, parameter) in parameters.iter().enumerate() {
        match parameter.get("in").and_then(Value::as_str) {
            Some("path") if parameter.get("required") != Some(&Value::Bool(true)) => {
                errors.push(format!(
                    "{location}/{index}/required: path parameters must be required"
                ));
            }
            Some("body") => body_count += 1,
            _ => {}
        }
    }

    if dialect == Dialect::Swagger2 && body_count > 1 {
        errors.push(format!("{location}: at most one body parameter is allowed"));
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
