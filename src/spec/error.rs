use std::path::PathBuf;

use super::Dialect;

/// Failures that abort loading a spec document. All of them are fatal to startup.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("failed to read spec file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch spec from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("failed to parse spec document: {0}")]
    Parse(String),
    #[error("no version information found in spec")]
    MissingVersion,
    #[error("unsupported specification version: {0}")]
    UnsupportedVersion(String),
    #[error("invalid {dialect} spec: {}", .errors.join("; "))]
    Validation {
        dialect: Dialect,
        errors: Vec<String>,
    },
    #[error("failed to read {dialect} document model: {message}")]
    Model { dialect: Dialect, message: String },
}

impl From<reqwest::Error> for SpecError {
    fn from(value: reqwest::Error) -> Self {
        let url = value
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        Self::Fetch {
            url,
            message: value.to_string(),
        }
    }
}
