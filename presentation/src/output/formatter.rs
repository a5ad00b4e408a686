//! Output formatter trait

use toolbox_application::RunReactOutput;

/// Trait for formatting run results
pub trait OutputFormatter {
    /// Format the complete run
    fn format(&self, output: &RunReactOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &RunReactOutput) -> String;

    /// Format the final answer only (concise output)
    fn format_answer_only(&self, output: &RunReactOutput) -> String;
}
