//! Tool protocol use case.
//!
//! Exposes the tool registry to external protocol clients (MCP) without
//! going through the ReAct loop: list what exists, call one tool by name.
//! The wire framing lives in infrastructure; this is the transport-neutral
//! half.

use crate::ports::tool_executor::ToolExecutorPort;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use toolbox_domain::{Observation, ToolArguments, ToolCall};
use tracing::{debug, info};

/// Errors reported to the protocol client as protocol-level errors.
///
/// A handler failure is *not* one of these: it is returned as content with
/// `is_error = true`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: expected an object, got {found}")]
    InvalidArguments { tool: String, found: String },
}

/// A tool as presented to protocol clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Text content returned from a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolContent {
    pub text: String,
    pub is_error: bool,
}

/// Adapter between protocol requests and the tool executor.
#[derive(Clone)]
pub struct ToolProtocolAdapter {
    tool_executor: Arc<dyn ToolExecutorPort>,
}

impl ToolProtocolAdapter {
    pub fn new(tool_executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self { tool_executor }
    }

    /// All tools, in registration order.
    pub fn list_tools(&self) -> Vec<ProtocolTool> {
        self.tool_executor
            .tool_descriptors()
            .into_iter()
            .map(|d| ProtocolTool {
                name: d.name,
                description: d.description,
                input_schema: d.parameters,
            })
            .collect()
    }

    /// Call a tool by name.
    ///
    /// `arguments` may be absent or `null` (no arguments); any other
    /// non-object value is rejected.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<ProtocolContent, ProtocolError> {
        if !self.tool_executor.has_tool(name) {
            debug!(tool = %name, "Protocol call for unknown tool");
            return Err(ProtocolError::UnknownTool(name.to_string()));
        }

        let arguments = match arguments {
            None | Some(Value::Null) => ToolArguments::new(),
            Some(Value::Object(map)) => ToolArguments::from(map),
            Some(other) => {
                return Err(ProtocolError::InvalidArguments {
                    tool: name.to_string(),
                    found: json_type_name(&other).to_string(),
                });
            }
        };

        info!(tool = %name, "Protocol tool call");
        let call = ToolCall::new(name).with_arguments(arguments);
        let result = self.tool_executor.execute(&call).await;
        let observation = Observation::from(&result);

        Ok(ProtocolContent {
            text: observation.text,
            is_error: observation.is_error,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
