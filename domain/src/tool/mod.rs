//! Tool domain module
//!
//! Defines what a tool *is* to the rest of the system, independent of where
//! it runs (in-process builtin, remote toolbox service) or who calls it (the
//! ReAct loop, an MCP client).
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌──────────────┐    ┌─────────────┐
//! │ ToolDefinition │───▶│ ToolCall     │───▶│ ToolResult   │───▶│ Observation │
//! │ (registry)     │    │ (invocation) │    │ (outcome)    │    │ (text)      │
//! └────────────────┘    └──────────────┘    └──────────────┘    └─────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: name, description, canonical schema, handler
//! - [`SchemaConverter`]: normalizes both accepted parameter declaration shapes
//! - [`ToolHandler`]: the executable capability behind a definition
//! - [`ToolArguments`]: insertion-ordered argument mapping
//! - [`Observation`]: the only rendering of a result the loop sees

pub mod entities;
pub mod handler;
pub mod schema;
pub mod value_objects;

pub use entities::{ToolArguments, ToolCall, ToolDefinition, ToolDescriptor};
pub use handler::{FnHandler, SyncFnHandler, ToolHandler};
pub use schema::{SchemaConverter, ToolParameter};
pub use value_objects::{Observation, ToolError, ToolResult};
