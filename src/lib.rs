//! OpenAPI 3.x / Swagger 2.0 to tool bridge.
//!
//! A spec document is compiled once at startup into a set of tool
//! descriptors, one per operation. Each descriptor carries its own endpoint
//! and HTTP verb as schema constants, so a single generic engine can invoke
//! any of them at runtime.
//!
//! # Architecture
//!
//! - `spec`: reading, version routing, reference expansion and validation
//! - `translate`: dialect schemas into the canonical [`SchemaNode`] tree
//! - `compiler`: operations into [`ToolDescriptor`]s
//! - `invoke`: HTTP execution of a descriptor plus the request log
//! - `mcp`: JSON-RPC tool host over stdio
//! - `config`: CLI/env configuration and tracing setup
//! - `core`: shared schema and descriptor types

pub mod compiler;
pub mod config;
pub mod core;
pub mod invoke;
pub mod mcp;
pub mod spec;
pub mod translate;

pub use crate::compiler::{CompileReport, ConversionError, HttpVerb};
pub use crate::core::{SchemaNode, ToolDescriptor, ToolSet};
pub use crate::invoke::{InvocationEngine, InvocationError, RequestLog};
pub use crate::spec::{compile_text, load_tools, Dialect, SpecError};
