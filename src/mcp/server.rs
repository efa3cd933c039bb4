//! Line-delimited JSON-RPC tool server.
//!
//! [`ToolHost`] binds the compiled tool set to the invocation engine.
//! [`McpServer`] speaks the protocol on top of it: each request is handled on
//! its own task and responses are funnelled through a single writer.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use super::types::{
    CallToolRequest, CallToolResult, CancelledNotification, Implementation, InitializeResult,
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListToolsResult, RequestId,
    ServerCapabilities, ToolsCapability, PROTOCOL_VERSION,
};
use crate::core::tool::ToolSet;
use crate::invoke::InvocationEngine;

/// Compiled tools plus the engine that executes them.
#[derive(Debug)]
pub struct ToolHost {
    tools: ToolSet,
    engine: InvocationEngine,
}

impl ToolHost {
    pub fn new(tools: ToolSet, engine: InvocationEngine) -> Self {
        Self { tools, engine }
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.tools.iter().map(|tool| tool.to_mcp_tool()).collect(),
            next_cursor: None,
        }
    }

    pub async fn call_tool(&self, request: CallToolRequest) -> CallToolResult {
        self.call_tool_until(request, std::future::pending()).await
    }

    pub async fn call_tool_until<F>(&self, request: CallToolRequest, cancel: F) -> CallToolResult
    where
        F: Future<Output = ()>,
    {
        let Some(tool) = self.tools.get(&request.name) else {
            tracing::warn!("call for unknown tool '{}'", request.name);
            return CallToolResult::error(format!("Unknown tool: {}", request.name));
        };
        let arguments = request.arguments.unwrap_or_default();
        self.engine.invoke_until(tool, &arguments, cancel).await
    }
}

pub struct McpServer {
    host: ToolHost,
    info: Implementation,
    in_flight: Mutex<HashMap<RequestId, oneshot::Sender<()>>>,
}

impl McpServer {
    pub fn new(host: ToolHost) -> Self {
        Self {
            host,
            info: Implementation::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &ToolHost {
        &self.host
    }

    /// Parse and dispatch one line. Unparseable input gets a parse error with
    /// a `null` id.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!("unparseable message: {e}");
                let error = if serde_json::from_str::<Value>(line).is_ok() {
                    JsonRpcError::invalid_request(e.to_string())
                } else {
                    JsonRpcError::parse_error(e.to_string())
                };
                Some(JsonRpcResponse::error(None, error))
            }
        }
    }

    /// Dispatch a request. Notifications never produce a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };
        tracing::debug!("<- {} ({id})", request.method);

        let outcome = match request.method.as_str() {
            "initialize" => to_result(&self.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => to_result(&self.host.list_tools()),
            "tools/call" => match parse_params::<CallToolRequest>(request.params) {
                Ok(call) => match self.call_tracked(id.clone(), call).await {
                    Ok(result) => to_result(&result),
                    Err(error) => Err(error),
                },
                Err(error) => Err(error),
            },
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(Some(id), error),
        })
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/cancelled" => {
                match parse_params::<CancelledNotification>(request.params.clone()) {
                    Ok(notice) => self.cancel(&notice.request_id, notice.reason.as_deref()),
                    Err(e) => tracing::warn!("malformed cancellation: {}", e.message),
                }
            }
            "notifications/initialized" => tracing::info!("client initialized"),
            other => tracing::debug!("ignoring notification '{other}'"),
        }
    }

    fn cancel(&self, id: &RequestId, reason: Option<&str>) {
        let sender = self.lock_in_flight().remove(id);
        match sender {
            Some(sender) => {
                tracing::info!("cancelling request {id}: {}", reason.unwrap_or("no reason given"));
                let _ = sender.send(());
            }
            None => tracing::debug!("cancellation for unknown or finished request {id}"),
        }
    }

    /// Run a call under its request id. An id already in flight is rejected
    /// so each cancellation reaches exactly one call.
    async fn call_tracked(
        &self,
        id: RequestId,
        call: CallToolRequest,
    ) -> Result<CallToolResult, JsonRpcError> {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        match self.lock_in_flight().entry(id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!("rejecting request {id}: id already in flight");
                return Err(JsonRpcError::invalid_request(format!(
                    "request id {id} is already in flight"
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(cancel_tx);
            }
        }

        // Only an explicit send cancels; a dropped sender means the call finished.
        let cancelled = async move {
            if cancel_rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        let result = self.host.call_tool_until(call, cancelled).await;

        self.lock_in_flight().remove(&id);
        Ok(result)
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, HashMap<RequestId, oneshot::Sender<()>>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn initialize_result(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: self.info.clone(),
            instructions: None,
        }
    }

    /// Serve until `reader` reaches EOF and every in-flight request has been
    /// answered.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let server = Arc::clone(&self);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Some(response) = server.handle_line(&line).await else {
                    return;
                };
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        if tx.send(encoded).is_err() {
                            tracing::warn!("response dropped: writer closed");
                        }
                    }
                    Err(e) => tracing::error!("failed to encode response: {e}"),
                }
            });
        }
        tracing::info!("input closed; draining in-flight requests");
        drop(lines);
        drop(tx);

        writer_task
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
    }

    pub async fn serve_stdio(self: Arc<Self>) -> std::io::Result<()> {
        tracing::info!("serving {} tools on stdio", self.host.tools().len());
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T, JsonRpcError> {
    let params = params.unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(params).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn to_result<T: serde::Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
