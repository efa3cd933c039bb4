//! Shared descriptor types produced by the compiler and consumed by the engine.

pub mod schema;
pub mod tool;

pub use schema::{Constraints, SchemaKind, SchemaNode};
pub use tool::{ToolDescriptor, ToolSet, ENDPOINT_PROPERTY, METHOD_PROPERTY, BODY_PROPERTY};
