//! Agent domain module
//!
//! The pure parts of the think-act-observe loop: response parsing, the
//! append-only conversation, the loop state machine and per-call records.

pub mod action_parser;
pub mod conversation;
pub mod entities;
pub mod tool_execution;

pub use action_parser::{ActionParser, ParsedAction};
pub use conversation::ConversationState;
pub use entities::{EXHAUSTED_MESSAGE, LoopState, ReactState, RunResult};
pub use tool_execution::{ToolExecution, ToolExecutionState};
