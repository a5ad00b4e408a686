//! Progress reporting for the ReAct loop
//!
//! Both reporters write to stderr; stdout carries only the result.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use toolbox_application::{NoReactProgress, ReactProgressNotifier};
use toolbox_domain::{LoopState, RunResult, ToolCall};

const PREVIEW_CHARS: usize = 80;

/// Reports progress with a spinner that shows the current loop step
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn state_message(state: LoopState) -> &'static str {
        match state {
            LoopState::Thinking => "Thinking...",
            LoopState::Acting => "Calling tool...",
            LoopState::Observing => "Reading observation...",
            LoopState::Answered => "Answered",
            LoopState::Exhausted => "Out of iterations",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactProgressNotifier for ProgressReporter {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        let Ok(mut guard) = self.spinner.lock() else {
            return;
        };
        let pb = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(format!("[{}/{}]", iteration, max_iterations));
    }

    fn on_state_change(&self, state: LoopState) {
        self.with_spinner(|pb| pb.set_message(Self::state_message(state)));
    }

    fn on_tool_call(&self, call: &ToolCall) {
        self.with_spinner(|pb| {
            pb.set_message(format!("{} {}", call.tool_name.bold(), call.arguments));
        });
    }

    fn on_tool_result(&self, tool_name: &str, success: bool, observation: &str) {
        self.with_spinner(|pb| {
            let mark = if success { "v".green() } else { "x".red() };
            pb.println(format!(
                "  {} {} {}",
                mark,
                tool_name,
                preview(observation).dimmed()
            ));
        });
    }

    fn on_unparseable(&self, _raw_text: &str) {
        self.with_spinner(|pb| pb.println(format!("  {} unparseable response", "?".yellow())));
    }

    fn on_complete(&self, result: &RunResult) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            let message = if result.is_exhausted() {
                "Stopped without an answer".yellow().to_string()
            } else {
                "Done!".green().to_string()
            };
            pb.finish_with_message(message);
        }
    }
}

/// Which reporter a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// No progress output (`--quiet`)
    Silent,
    /// Animated spinner, for an interactive stderr
    Spinner,
    /// One plain line per event, for redirected stderr
    Plain,
}

impl ProgressMode {
    pub fn detect(quiet: bool, stderr_is_terminal: bool) -> Self {
        match (quiet, stderr_is_terminal) {
            (true, _) => ProgressMode::Silent,
            (false, true) => ProgressMode::Spinner,
            (false, false) => ProgressMode::Plain,
        }
    }

    pub fn notifier(self) -> Box<dyn ReactProgressNotifier> {
        match self {
            ProgressMode::Silent => Box::new(NoReactProgress),
            ProgressMode::Spinner => Box::new(ProgressReporter::new()),
            ProgressMode::Plain => Box::new(SimpleProgress),
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ReactProgressNotifier for SimpleProgress {
    fn on_iteration_start(&self, iteration: usize, max_iterations: usize) {
        eprintln!(
            "{} {} {}/{}",
            "->".cyan(),
            "Iteration".bold(),
            iteration,
            max_iterations
        );
    }

    fn on_thought(&self, text: &str) {
        eprintln!("  {} {}", "Thought:".dimmed(), preview(text));
    }

    fn on_tool_call(&self, call: &ToolCall) {
        eprintln!("  {} {} {}", "Action:".cyan(), call.tool_name, call.arguments);
    }

    fn on_tool_result(&self, tool_name: &str, success: bool, observation: &str) {
        if success {
            eprintln!("  {} {} {}", "v".green(), tool_name, preview(observation));
        } else {
            eprintln!("  {} {} {}", "x".red(), tool_name, preview(observation));
        }
    }

    fn on_unparseable(&self, raw_text: &str) {
        eprintln!("  {} {}", "?".yellow(), preview(raw_text));
    }

    fn on_complete(&self, result: &RunResult) {
        if result.is_exhausted() {
            eprintln!("{}", result.to_string().yellow());
        }
        eprintln!();
    }
}

/// First line of `text`, cut to a fixed width.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_first_line_only() {
        assert_eq!(preview("Result: 4\nmore"), "Result: 4");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(200);
        let p = preview(&long);
        assert_eq!(p.len(), PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_reporter_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        reporter.on_state_change(LoopState::Thinking);
        reporter.on_iteration_start(1, 5);
        reporter.on_state_change(LoopState::Acting);
        reporter.on_tool_call(&ToolCall::new("calculator").with_arg("expression", "2+2"));
        reporter.on_tool_result("calculator", true, "Result: 4");
        reporter.on_complete(&RunResult::answered("4"));
        assert!(reporter.spinner.lock().unwrap().is_none());
    }

    #[test]
    fn test_progress_mode_detect() {
        assert_eq!(ProgressMode::detect(true, true), ProgressMode::Silent);
        assert_eq!(ProgressMode::detect(true, false), ProgressMode::Silent);
        assert_eq!(ProgressMode::detect(false, true), ProgressMode::Spinner);
        assert_eq!(ProgressMode::detect(false, false), ProgressMode::Plain);
    }

    #[test]
    fn test_simple_progress_accepts_events() {
        let progress = ProgressMode::Plain.notifier();
        progress.on_iteration_start(1, 5);
        progress.on_tool_call(&ToolCall::new("calculator").with_arg("expression", "2+2"));
        progress.on_tool_result("calculator", true, "Result: 4");
        progress.on_complete(&RunResult::Exhausted { iterations: 5 });
    }
}
