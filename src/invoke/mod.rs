//! Generic HTTP invocation of compiled tools.
//!
//! The engine reads everything it needs from the descriptor itself: the
//! `endpoint` and `method` constants fix the target, path placeholders are
//! filled from the caller's arguments, and `body` (when present) becomes the
//! JSON payload. Each call performs exactly one outbound request.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Version};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::tool::{ToolDescriptor, BODY_PROPERTY, ENDPOINT_PROPERTY, METHOD_PROPERTY};
use crate::mcp::types::CallToolResult;

mod error;
mod request_log;

pub use error::InvocationError;
pub use request_log::RequestLog;

#[derive(Debug, Clone)]
pub struct InvocationEngine {
    client: reqwest::Client,
    log: Arc<RequestLog>,
}

impl InvocationEngine {
    pub fn new(client: reqwest::Client, log: Arc<RequestLog>) -> Self {
        Self { client, log }
    }

    /// Engine with a fresh client. No request timeout is configured; calls
    /// end when the server answers or the caller cancels.
    pub fn with_log(log: Arc<RequestLog>) -> Result<Self, InvocationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InvocationError::Transport(e.to_string()))?;
        Ok(Self::new(client, log))
    }

    /// The shared HTTP client, also used for fetching remote specs.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn log(&self) -> &Arc<RequestLog> {
        &self.log
    }

    /// Invoke without an external cancellation signal.
    pub async fn invoke(&self, tool: &ToolDescriptor, arguments: &Map<String, Value>) -> CallToolResult {
        self.invoke_until(tool, arguments, std::future::pending()).await
    }

    /// Invoke until the response arrives or `cancel` completes, whichever is
    /// first. Every failure is returned as an error result.
    pub async fn invoke_until<F>(
        &self,
        tool: &ToolDescriptor,
        arguments: &Map<String, Value>,
        cancel: F,
    ) -> CallToolResult
    where
        F: Future<Output = ()>,
    {
        let call_id = Uuid::new_v4();
        match self.execute(call_id, tool, arguments, cancel).await {
            Ok(text) => CallToolResult::text(text),
            Err(e) => {
                tracing::warn!("tool '{}' call {call_id} failed: {e}", tool.name);
                e.into_tool_result()
            }
        }
    }

    async fn execute<F>(
        &self,
        call_id: Uuid,
        tool: &ToolDescriptor,
        arguments: &Map<String, Value>,
        cancel: F,
    ) -> Result<String, InvocationError>
    where
        F: Future<Output = ()>,
    {
        let endpoint = tool.endpoint().ok_or(InvocationError::MissingConstant("Endpoint"))?;
        let verb = tool.method().ok_or(InvocationError::MissingConstant("Method"))?;
        let method = Method::from_bytes(verb.as_bytes())
            .map_err(|_| InvocationError::InvalidMethod(verb.to_string()))?;

        let url = resolve_endpoint(endpoint, arguments);
        let body = match arguments.get(BODY_PROPERTY) {
            Some(value) => Some(serde_json::to_string_pretty(value)?),
            None => None,
        };

        let mut builder = self.client.request(method, &url);
        if let Some(body) = &body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        let request = builder.build().map_err(|e| InvocationError::InvalidUrl {
            url: url.clone(),
            message: e.to_string(),
        })?;

        tracing::info!("tool '{}' call {call_id}: {} {}", tool.name, request.method(), request.url());
        self.log.record(&format!("REQUEST [{call_id}]"), &dump_request(&request, body.as_deref()));
        if let Some(body) = &body {
            self.log.record(&format!("REQUEST BODY [{call_id}]"), body);
        }

        tokio::pin!(cancel);

        let sent = tokio::select! {
            _ = &mut cancel => return Err(InvocationError::Cancelled),
            sent = self.client.execute(request) => sent,
        };
        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                self.log.record(&format!("REQUEST ERROR [{call_id}]"), &e.to_string());
                return Err(InvocationError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let bytes = tokio::select! {
            _ = &mut cancel => return Err(InvocationError::Cancelled),
            bytes = response.bytes() => bytes.map_err(|e| InvocationError::ReadBody(e.to_string()))?,
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();

        self.log.record(
            &format!("RESPONSE [{call_id}]"),
            &dump_response(version, status, &headers, &text),
        );
        tracing::debug!("tool '{}' call {call_id}: {status}", tool.name);

        if status.as_u16() >= 400 {
            return Err(InvocationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(indent_json(&text).unwrap_or(text))
    }
}

/// Re-indent a JSON document with two spaces, keeping every token as sent.
/// Numbers are copied verbatim so wide integers and exact decimals survive.
/// Returns `None` when the text is not JSON.
pub fn indent_json(text: &str) -> Option<String> {
    serde_json::from_str::<serde::de::IgnoredAny>(text).ok()?;

    fn newline(out: &mut String, depth: usize) {
        out.push('\n');
        for _ in 0..depth {
            out.push_str("  ");
        }
    }

    let mut out = String::with_capacity(text.len() + text.len() / 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut just_opened = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        if c.is_ascii_whitespace() {
            continue;
        }
        if just_opened {
            just_opened = false;
            if c == '}' || c == ']' {
                depth = depth.saturating_sub(1);
                out.push(c);
                continue;
            }
            newline(&mut out, depth);
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                depth += 1;
                just_opened = true;
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, depth);
            }
            ':' => out.push_str(": "),
            other => out.push(other),
        }
    }
    Some(out)
}

/// Fill `{name}` placeholders from the arguments. Reserved keys never
/// substitute and arguments without a placeholder are ignored.
pub fn resolve_endpoint(template: &str, arguments: &Map<String, Value>) -> String {
    let mut url = template.to_string();
    for (name, value) in arguments {
        if matches!(name.as_str(), ENDPOINT_PROPERTY | METHOD_PROPERTY | BODY_PROPERTY) {
            continue;
        }
        let placeholder = format!("{{{name}}}");
        if url.contains(&placeholder) {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            url = url.replace(&placeholder, &urlencoding::encode(&text));
        }
    }
    url
}

fn dump_request(request: &reqwest::Request, body: Option<&str>) -> String {
    let url = request.url();
    let mut out = format!("{} {} {:?}\n", request.method(), url, request.version());
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => out.push_str(&format!("Host: {host}:{port}\n")),
            None => out.push_str(&format!("Host: {host}\n")),
        }
    }
    push_headers(&mut out, request.headers());
    out.push('\n');
    if let Some(body) = body {
        out.push_str(body);
        out.push('\n');
    }
    out
}

fn dump_response(version: Version, status: StatusCode, headers: &HeaderMap, body: &str) -> String {
    let mut out = format!("{version:?} {status}\n");
    push_headers(&mut out, headers);
    out.push('\n');
    out.push_str(body);
    out
}

fn push_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        out.push_str(&format!("{name}: {}\n", value.to_str().unwrap_or("<binary>")));
    }
}
