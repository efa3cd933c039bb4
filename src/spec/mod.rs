//! Spec loading and dialect routing.
//!
//! A document is read from a file or URI, its dialect is detected from the
//! top-level version keys, local references are expanded, and the result is
//! validated before any translation happens. Validation failures are reported
//! together and nothing is compiled.
//!
//! # Pipeline
//!
//! 1. [`read_source`] pulls the raw text
//! 2. [`detect_version`] and [`Dialect::route`] pick the pipeline
//! 3. [`parse_document`] turns JSON or YAML into a value tree
//! 4. [`refs::expand_local_refs`] inlines local references and
//!    [`validate::validate`] checks the result against the version's meta-schema
//! 5. The typed dialect model is handed to the compiler

use std::fmt;

use serde_json::Value;

use crate::compiler::{compile_openapi, compile_swagger, CompileReport};

pub mod error;
pub mod facets;
pub mod openapi;
pub mod refs;
pub mod source;
pub mod swagger;
pub mod validate;

pub use error::SpecError;
pub use source::{parse_document, read_source, SpecSource};

/// The two supported spec dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Swagger2,
    OpenApi3,
}

impl Dialect {
    /// Route a version string to its pipeline: `2.x` is Swagger, `3.x` is OpenAPI.
    pub fn route(version: &str) -> Result<Self, SpecError> {
        let version = version.trim();
        if version == "2" || version.starts_with("2.") {
            Ok(Self::Swagger2)
        } else if version == "3" || version.starts_with("3.") {
            Ok(Self::OpenApi3)
        } else {
            Err(SpecError::UnsupportedVersion(version.to_string()))
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Swagger2 => write!(f, "Swagger 2.0"),
            Dialect::OpenApi3 => write!(f, "OpenAPI 3.x"),
        }
    }
}

/// The five verb slots of a path item, in compile priority order:
/// GET, POST, PUT, DELETE, PATCH.
pub trait OperationSlots {
    type Operation;

    fn slots(&self) -> [Option<&Self::Operation>; 5];
}

/// Markers used when the document cannot be parsed structurally.
const TEXT_MARKERS: [(&str, &str); 4] = [
    ("swagger: \"2.0\"", "2.0"),
    ("swagger: '2.0'", "2.0"),
    ("openapi: \"3.", "3.0"),
    ("openapi: '3.", "3.0"),
];

/// Detect the spec version from the top-level `swagger` / `openapi` keys.
///
/// JSON is tried first, then YAML. If neither parses, the text is scanned for
/// the usual YAML version lines.
pub fn detect_version(text: &str) -> Result<String, SpecError> {
    match parse_document(text) {
        Ok(document) => version_of(&document).ok_or(SpecError::MissingVersion),
        Err(parse_error) => TEXT_MARKERS
            .iter()
            .find(|(marker, _)| text.contains(marker))
            .map(|(_, version)| version.to_string())
            .ok_or(parse_error),
    }
}

fn version_of(document: &Value) -> Option<String> {
    ["swagger", "openapi"].iter().find_map(|key| {
        match document.get(key)? {
            Value::String(version) if !version.trim().is_empty() => Some(version.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    })
}

/// Expand references and validate the document for the given dialect.
pub fn prepare_document(dialect: Dialect, document: &Value) -> Result<Value, SpecError> {
    let (expanded, mut errors) = match refs::expand_local_refs(document) {
        Ok(expanded) => (expanded, Vec::new()),
        Err(errors) => (document.clone(), errors),
    };

    if let Err(structural) = validate::validate(dialect, &expanded) {
        errors.extend(structural);
    }

    if errors.is_empty() {
        Ok(expanded)
    } else {
        Err(SpecError::Validation { dialect, errors })
    }
}

/// Compile already-loaded document text into tools.
pub fn compile_text(text: &str) -> Result<CompileReport, SpecError> {
    let version = detect_version(text)?;
    let dialect = Dialect::route(&version)?;
    tracing::info!("detected {dialect} document (version {version})");

    let document = parse_document(text)?;
    let document = prepare_document(dialect, &document)?;

    let report = match dialect {
        Dialect::Swagger2 => {
            let model: swagger::SwaggerDocument =
                serde_json::from_value(document).map_err(|e| SpecError::Model {
                    dialect,
                    message: e.to_string(),
                })?;
            compile_swagger(&model)
        }
        Dialect::OpenApi3 => {
            let model: openapi::OpenApiDocument =
                serde_json::from_value(document).map_err(|e| SpecError::Model {
                    dialect,
                    message: e.to_string(),
                })?;
            compile_openapi(&model)
        }
    };

    Ok(report)
}

/// Load a spec from a path or URI and compile every operation into a tool.
pub async fn load_tools(input: &str, client: &reqwest::Client) -> Result<CompileReport, SpecError> {
    let source = SpecSource::parse(input);
    tracing::info!("loading spec from {source}");
    let text = read_source(&source, client).await?;
    compile_text(&text)
}
