//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid tool definition: {0}")]
    InvalidTool(String),

    #[error("Invalid loop transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was raised by the loop state machine
    pub fn is_transition_error(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
