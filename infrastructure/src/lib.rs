//! Infrastructure layer for toolbox-agent
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the tool registry and executor, the OpenAI-compatible
//! backend, configuration file loading, the JSONL transcript logger and the
//! MCP stdio server.

pub mod config;
pub mod logging;
pub mod mcp;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileBackendConfig, FileConfig,
    FileToolsConfig,
};
pub use logging::JsonlConversationLogger;
pub use mcp::StdioServer;
pub use providers::{OpenAiCompatConfig, OpenAiCompatGateway};
pub use tools::{
    CatalogueError, RegistryError, RegistryToolExecutor, ToolCatalogue, ToolDeclaration,
    ToolRegistry, ToolboxHandler, assemble_registry, builtin_tools, toolbox_definitions,
};
