//! Tool domain value objects: execution results, errors and observations.
//!
//! Every tool execution produces a [`ToolResult`]. The loop never sees the
//! result directly; it sees an [`Observation`], the single rendering of a
//! result into conversation text.
//!
//! | Code | Description |
//! |------|-------------|
//! | `NOT_FOUND` | Unknown tool |
//! | `INVALID_ARGUMENT` | Missing/wrong parameters, model can fix |
//! | `EXECUTION_FAILED` | Handler failure (arithmetic error, HTTP error) |
//! | `TIMEOUT` | Handler exceeded the configured time limit |

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error that occurred during tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "TIMEOUT")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Unknown tool; the message lists what is available.
    pub fn unknown_tool(name: &str, available: &[String]) -> Self {
        let available = if available.is_empty() {
            "(none)".to_string()
        } else {
            available.join(", ")
        };
        Self::new(
            "NOT_FOUND",
            format!("Unknown tool: {}. Available tools: {}", name, available),
        )
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Resource not found: {}", resource.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new("TIMEOUT", format!("Operation timed out: {}", operation.into()))
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Output text (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a successful result from a handler's return value.
    ///
    /// Strings are kept verbatim; anything else is pretty-printed JSON.
    pub fn from_value(tool_name: impl Into<String>, value: Value) -> Self {
        let output = match value {
            Value::String(s) => s,
            other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
        };
        Self::success(tool_name, output)
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }
}

/// Text fed back to the model after a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub tool_name: String,
    pub text: String,
    pub is_error: bool,
}

impl Observation {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<&ToolResult> for Observation {
    fn from(result: &ToolResult) -> Self {
        let (text, is_error) = match (&result.output, &result.error) {
            (_, Some(error)) => (format!("Error: {}", error.message), true),
            (Some(output), None) => (output.clone(), false),
            (None, None) => (String::new(), !result.success),
        };
        Self {
            tool_name: result.tool_name.clone(),
            text,
            is_error,
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_error() {
        let err = ToolError::timeout("calculator").with_details("after 30s");

        assert_eq!(err.code, "TIMEOUT");
        assert!(err.message.contains("calculator"));
        assert_eq!(err.to_string(), "[TIMEOUT] Operation timed out: calculator (after 30s)");
    }

    #[test]
    fn test_unknown_tool_message() {
        let err = ToolError::unknown_tool(
            "missing_tool",
            &["calculator".to_string(), "search".to_string()],
        );
        assert!(err.is_not_found());
        assert_eq!(
            err.message,
            "Unknown tool: missing_tool. Available tools: calculator, search"
        );

        let err = ToolError::unknown_tool("x", &[]);
        assert!(err.message.ends_with("(none)"));
    }

    #[test]
    fn test_result_from_string_value_is_verbatim() {
        let result = ToolResult::from_value("calculator", json!("Result: 4"));
        assert!(result.is_success());
        assert_eq!(result.output(), Some("Result: 4"));
    }

    #[test]
    fn test_result_from_structured_value_is_pretty_json() {
        let result = ToolResult::from_value("lookup", json!({"a": 1}));
        assert_eq!(result.output(), Some("{\n  \"a\": 1\n}"));
    }

    #[test]
    fn test_observation_from_success() {
        let result = ToolResult::success("search", "found");
        let observation = Observation::from(&result);

        assert_eq!(observation.text, "found");
        assert!(!observation.is_error);
        assert_eq!(observation.tool_name, "search");
    }

    #[test]
    fn test_observation_from_failure() {
        let result = ToolResult::failure(
            "calculator",
            ToolError::execution_failed("division by zero"),
        );
        let observation = Observation::from(&result);

        assert_eq!(observation.to_string(), "Error: division by zero");
        assert!(observation.is_error);
    }
}
