//! Tool Executor port
//!
//! Defines the interface for executing tools from the registry.

use async_trait::async_trait;
use toolbox_domain::{ToolCall, ToolDescriptor, ToolResult};

/// Port for tool execution
///
/// `execute` never fails: an unknown tool or a handler error is reported as
/// a failed [`ToolResult`], which the loop turns into an observation.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Descriptors of all available tools, in registration order
    fn tool_descriptors(&self) -> Vec<ToolDescriptor>;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_descriptors().iter().any(|t| t.name == name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<String> {
        self.tool_descriptors().into_iter().map(|t| t.name).collect()
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
