use serde_json::json;

use crate::mcp::types::CallToolResult;

/// Failures of a single tool invocation. None of them are fatal: each one is
/// turned into an error [`CallToolResult`] and the engine stays usable.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("{0} configuration not found in tool schema")]
    MissingConstant(&'static str),
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("invalid request URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    #[error("failed to serialize request body: {0}")]
    BodySerialization(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("request cancelled")]
    Cancelled,
    #[error("failed to read response: {0}")]
    ReadBody(String),
    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

impl InvocationError {
    pub fn into_tool_result(self) -> CallToolResult {
        let result = CallToolResult::error(self.to_string());
        match self {
            Self::Status { status, body } => {
                result.with_structured(json!({ "status": status, "body": body }))
            }
            _ => result,
        }
    }
}
