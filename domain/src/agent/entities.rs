//! Agent domain entities: loop state machine and run outcome.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Text shown when a run ends without a final answer.
pub const EXHAUSTED_MESSAGE: &str = "Maximum iterations reached without final answer";

/// Phase of the think-act-observe loop.
///
/// ```text
/// Thinking ──> Acting ──> Observing ──> Thinking
///    │  └────> Answered
///    └───────> Exhausted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// Waiting on the backend for the next step
    Thinking,
    /// Executing a tool call
    Acting,
    /// Folding an observation into the conversation
    Observing,
    /// Terminal: a final answer was produced
    Answered,
    /// Terminal: the iteration budget ran out
    Exhausted,
}

impl LoopState {
    pub fn as_str(&self) -> &str {
        match self {
            LoopState::Thinking => "thinking",
            LoopState::Acting => "acting",
            LoopState::Observing => "observing",
            LoopState::Answered => "answered",
            LoopState::Exhausted => "exhausted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Answered | LoopState::Exhausted)
    }

    /// Whether the loop may move from `self` to `next`.
    pub fn can_transition_to(&self, next: LoopState) -> bool {
        use LoopState::*;
        matches!(
            (self, next),
            (Thinking, Thinking | Acting | Answered | Exhausted)
                | (Acting, Observing)
                | (Observing, Thinking)
        )
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one run: current phase plus the iteration budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactState {
    state: LoopState,
    iteration: usize,
    max_iterations: usize,
}

impl ReactState {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            state: LoopState::Thinking,
            iteration: 0,
            max_iterations,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Iterations started so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Move to `next`, rejecting transitions outside the table.
    pub fn transition(&mut self, next: LoopState) -> Result<(), DomainError> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Increments iteration count and returns `true` if within limits.
    pub fn increment_iteration(&mut self) -> bool {
        if self.iteration >= self.max_iterations {
            return false;
        }
        self.iteration += 1;
        true
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResult {
    /// The model produced a final answer.
    Answered { answer: String },
    /// The iteration budget ran out first.
    Exhausted { iterations: usize },
}

impl RunResult {
    pub fn answered(answer: impl Into<String>) -> Self {
        RunResult::Answered {
            answer: answer.into(),
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            RunResult::Answered { answer } => Some(answer),
            RunResult::Exhausted { .. } => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RunResult::Exhausted { .. })
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunResult::Answered { answer } => f.write_str(answer),
            RunResult::Exhausted { .. } => f.write_str(EXHAUSTED_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use LoopState::*;
        assert!(Thinking.can_transition_to(Acting));
        assert!(Thinking.can_transition_to(Thinking));
        assert!(Acting.can_transition_to(Observing));
        assert!(Observing.can_transition_to(Thinking));
        assert!(Thinking.can_transition_to(Exhausted));

        assert!(!Acting.can_transition_to(Answered));
        assert!(!Observing.can_transition_to(Acting));
        assert!(!Answered.can_transition_to(Thinking));
        assert!(!Exhausted.can_transition_to(Thinking));
    }

    #[test]
    fn test_invalid_transition_is_error() {
        let mut state = ReactState::new(3);
        state.transition(LoopState::Answered).unwrap();
        assert!(state.is_finished());

        let err = state.transition(LoopState::Thinking).unwrap_err();
        assert!(err.is_transition_error());
        assert_eq!(state.state(), LoopState::Answered);
    }

    #[test]
    fn test_iteration_budget() {
        let mut state = ReactState::new(2);
        assert!(state.increment_iteration());
        assert!(state.increment_iteration());
        assert!(!state.increment_iteration());
        assert_eq!(state.iteration(), 2);
    }

    #[test]
    fn test_zero_budget() {
        let mut state = ReactState::new(0);
        assert!(!state.increment_iteration());
        assert_eq!(state.iteration(), 0);
    }

    #[test]
    fn test_run_result_display() {
        assert_eq!(RunResult::answered("4").to_string(), "4");
        assert_eq!(RunResult::answered("4").answer(), Some("4"));

        let exhausted = RunResult::Exhausted { iterations: 3 };
        assert!(exhausted.is_exhausted());
        assert!(exhausted.answer().is_none());
        assert_eq!(exhausted.to_string(), EXHAUSTED_MESSAGE);
    }
}
