//! Domain layer for toolbox-agent
//!
//! This crate contains the core logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tools**: a [`ToolDefinition`] pairs a canonical parameter schema
//!   (produced by [`SchemaConverter`]) with a [`ToolHandler`].
//! - **Actions**: [`ActionParser`] turns a backend response into a
//!   [`ParsedAction`] (thought, tool call, final answer or unparseable).
//! - **Loop**: [`ReactState`] tracks the think-act-observe state machine and
//!   its iteration budget; [`ConversationState`] is the append-only transcript.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use agent::{
    action_parser::{ActionParser, ParsedAction},
    conversation::ConversationState,
    entities::{EXHAUSTED_MESSAGE, LoopState, ReactState, RunResult},
    tool_execution::{ToolExecution, ToolExecutionState},
};
pub use core::error::DomainError;
pub use prompt::ReactPromptTemplate;
pub use session::{
    entities::{Message, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    entities::{ToolArguments, ToolCall, ToolDefinition, ToolDescriptor},
    handler::{FnHandler, SyncFnHandler, ToolHandler},
    schema::{SchemaConverter, ToolParameter},
    value_objects::{Observation, ToolError, ToolResult},
};
