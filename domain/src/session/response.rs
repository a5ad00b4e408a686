//! Backend response types.
//!
//! A backend returns either plain text (ReAct text protocol) or a mix of
//! text and native tool-use blocks (function calling). Both are carried by
//! [`LlmResponse`]; the action parser decides what the response means.
//!
//! ```text
//! Text protocol:    "Thought: ...\nAction: calculator\nAction Input: {...}"
//! Native tool use:  [Text("..."), ToolUse { id, name, input }]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single block of content within a backend response.
///
/// # Examples
///
/// ```
/// use toolbox_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::Text("Let me compute that.".to_string());
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "call_1".to_string(),
///     name: "calculator".to_string(),
///     input: serde_json::json!("{\"expression\": \"2+2\"}"),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    /// A text content block from the model.
    Text(String),

    /// A native tool-call request from the model.
    ToolUse {
        /// Backend-assigned ID (e.g. "call_abc123").
        id: String,
        /// Tool name as produced by the model; not guaranteed to exist.
        name: String,
        /// Raw arguments: an object, or a JSON-encoded string that may be
        /// malformed. Interpreted by the action parser.
        input: Value,
    },
}

impl ContentBlock {
    /// Returns the text content if this is a `Text` block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &Value)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response.
    EndTurn,
    /// The model requested tool calls.
    ToolUse,
    /// Hit the token limit; response may be truncated.
    MaxTokens,
    /// Backend-specific stop reason.
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from a model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// Content blocks in the response (text and/or tool use).
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: Option<StopReason>,
    /// Model identifier (if returned by the backend).
    pub model: Option<String>,
}

impl LlmResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// `ToolUse` blocks in the order the backend returned them.
    pub fn tool_uses(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.content.iter().filter_map(ContentBlock::as_tool_use)
    }

    /// Returns `true` if the response contains any tool use requests.
    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
