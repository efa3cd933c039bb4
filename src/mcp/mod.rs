//! MCP (Model Context Protocol) tool serving.
//!
//! The compiled tool set is exposed over line-delimited JSON-RPC on stdio:
//! - `types`: protocol envelope and tool payloads
//! - `server`: [`ToolHost`] (tools + engine) and [`McpServer`] (dispatch, stdio loop)

pub mod server;
pub mod types;

pub use server::{McpServer, ToolHost};
