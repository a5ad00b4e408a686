//! Application layer for toolbox-agent
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway},
    react_progress::{NoReactProgress, ReactProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::run_react::{
    ProbeReport, RunReactError, RunReactInput, RunReactOutput, RunReactUseCase,
};
pub use use_cases::tool_protocol::{
    ProtocolContent, ProtocolError, ProtocolTool, ToolProtocolAdapter,
};
