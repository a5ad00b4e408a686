//! Record of one tool call made by the loop.
//!
//! ```text
//! start(call) ──> Running ──finish(result)──> Completed | Error
//! ```
//!
//! The duration is the executor's measurement when the result carries one,
//! otherwise wall-clock time between `start` and `finish`.

use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Longest output kept in a [`ToolExecutionState::Completed`] record.
pub const OUTPUT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolExecutionState {
    Running {
        /// Milliseconds since the Unix epoch
        started_at: u64,
    },
    Completed {
        duration_ms: u64,
        output_preview: String,
    },
    Error {
        duration_ms: u64,
        error_message: String,
    },
}

/// One tool call and its outcome, tagged with the iteration that made it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecution {
    pub call: ToolCall,
    /// 1-indexed loop iteration
    pub iteration: usize,
    pub state: ToolExecutionState,
}

impl ToolExecution {
    pub fn start(call: &ToolCall, iteration: usize) -> Self {
        Self {
            call: call.clone(),
            iteration,
            state: ToolExecutionState::Running {
                started_at: now_millis(),
            },
        }
    }

    /// Record the result. Only the first result counts.
    pub fn finish(&mut self, result: &ToolResult) {
        let ToolExecutionState::Running { started_at } = self.state else {
            return;
        };
        let duration_ms = result
            .duration_ms
            .unwrap_or_else(|| now_millis().saturating_sub(started_at));

        self.state = match result.error() {
            Some(error) => ToolExecutionState::Error {
                duration_ms,
                error_message: error.message.clone(),
            },
            None => ToolExecutionState::Completed {
                duration_ms,
                output_preview: preview(result.output().unwrap_or_default()),
            },
        };
    }

    pub fn tool_name(&self) -> &str {
        &self.call.tool_name
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, ToolExecutionState::Running { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, ToolExecutionState::Error { .. })
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self.state {
            ToolExecutionState::Running { .. } => None,
            ToolExecutionState::Completed { duration_ms, .. }
            | ToolExecutionState::Error { duration_ms, .. } => Some(duration_ms),
        }
    }
}

fn preview(output: &str) -> String {
    if output.chars().count() <= OUTPUT_PREVIEW_CHARS {
        return output.to_string();
    }
    let cut: String = output.chars().take(OUTPUT_PREVIEW_CHARS - 3).collect();
    format!("{}...", cut)
}

fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
