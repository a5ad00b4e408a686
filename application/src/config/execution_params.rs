//! Execution parameters: loop control for [`RunReactUseCase`](crate::use_cases::run_react::RunReactUseCase).
//!
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};

/// Execution loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of think-act-observe iterations.
    pub max_iterations: usize,
    /// Advertise the tool catalogue to the backend for native function calling.
    /// The text protocol is always accepted regardless.
    pub native_tools: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            native_tools: false,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_native_tools(mut self, enabled: bool) -> Self {
        self.native_tools = enabled;
        self
    }
}
