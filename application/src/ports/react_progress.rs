//! ReAct loop progress port.
//!
//! [`ReactProgressNotifier`] is an output port that the presentation layer
//! implements to display loop progress. All methods have default no-op
//! implementations, so implementers only override what they display.

use toolbox_domain::{LoopState, RunResult, ToolCall};

/// Progress notifier for the think-act-observe loop.
pub trait ReactProgressNotifier: Send + Sync {
    /// Called when an iteration begins (1-indexed)
    fn on_iteration_start(&self, _iteration: usize, _max_iterations: usize) {}

    /// Called when the loop changes state
    fn on_state_change(&self, _state: LoopState) {}

    /// Called with the model's reasoning text, when present
    fn on_thought(&self, _text: &str) {}

    /// Called when a tool is about to be invoked
    fn on_tool_call(&self, _call: &ToolCall) {}

    /// Called when a tool returns, with the observation text
    fn on_tool_result(&self, _tool_name: &str, _success: bool, _observation: &str) {}

    /// Called when a response could not be interpreted
    fn on_unparseable(&self, _raw_text: &str) {}

    /// Called once when the run finishes
    fn on_complete(&self, _result: &RunResult) {}
}

/// No-op implementation for when progress display is disabled.
pub struct NoReactProgress;

impl ReactProgressNotifier for NoReactProgress {}
