//! Console output formatter for run results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use toolbox_application::{ProbeReport, RunReactOutput};
use toolbox_domain::{Role, RunResult, ToolDescriptor, ToolExecutionState};

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run: transcript, tool executions, outcome
    pub fn format(output: &RunReactOutput) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Toolbox Agent Run"));
        text.push('\n');

        text.push_str(&Self::section_header("Transcript"));
        // The system turn is the fixed instruction block; skip it.
        for message in output
            .conversation
            .messages()
            .iter()
            .filter(|m| m.role != Role::System)
        {
            let label = match message.role {
                Role::User => "User".cyan().bold(),
                Role::Assistant => "Assistant".yellow().bold(),
                Role::Tool => "Observation".green().bold(),
                Role::System => "System".dimmed(),
            };
            text.push_str(&format!(
                "\n{}\n{}\n",
                label,
                Self::indent(message.content.trim_end(), "  ")
            ));
        }

        if !output.tool_executions.is_empty() {
            text.push_str(&Self::section_header("Tool Calls"));
            for execution in &output.tool_executions {
                let duration = execution
                    .duration_ms()
                    .map(|ms| format!(" ({}ms)", ms))
                    .unwrap_or_default();
                let line = match &execution.state {
                    ToolExecutionState::Completed { output_preview, .. } => format!(
                        "  {} [{}] {}{}: {}",
                        "v".green(),
                        execution.iteration,
                        execution.tool_name(),
                        duration,
                        output_preview
                    ),
                    ToolExecutionState::Error { error_message, .. } => format!(
                        "  {} [{}] {}{}: {}",
                        "x".red(),
                        execution.iteration,
                        execution.tool_name(),
                        duration,
                        error_message
                    ),
                    _ => format!(
                        "  {} [{}] {}",
                        "-".dimmed(),
                        execution.iteration,
                        execution.tool_name()
                    ),
                };
                text.push_str(&line);
                text.push('\n');
            }
        }

        text.push_str(&Self::section_header("Result"));
        text.push_str(&format!(
            "\n{} {}\n",
            "Iterations:".cyan().bold(),
            output.iterations
        ));
        text.push_str(&format!("\n{}\n", Self::format_answer_only(output)));
        text.push_str(&Self::footer());

        text
    }

    /// Format as JSON
    pub fn format_json(output: &RunReactOutput) -> String {
        serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_answer_only(output: &RunReactOutput) -> String {
        match &output.result {
            RunResult::Answered { answer } => answer.clone(),
            RunResult::Exhausted { .. } => output.result.to_string().yellow().to_string(),
        }
    }

    /// Format the tool catalogue (for --list-tools)
    pub fn format_tools(tools: &[ToolDescriptor]) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools registered.".yellow());
        }

        let mut text = format!("{} ({})\n", "Registered tools".cyan().bold(), tools.len());
        for tool in tools {
            text.push_str(&format!("\n  {} - {}\n", tool.name.bold(), tool.description));
            let required = toolbox_domain::SchemaConverter::required_names(&tool.parameters);
            for name in toolbox_domain::SchemaConverter::property_names(&tool.parameters) {
                let marker = if required.contains(&name) { "*" } else { " " };
                text.push_str(&format!("      {}{}\n", marker, name));
            }
        }
        text
    }

    /// Format a function-calling probe report (for --probe)
    pub fn format_probe(report: &ProbeReport) -> String {
        let verdict = if report.supports_tool_calling() {
            "supported".green().bold()
        } else {
            "not detected".red().bold()
        };
        let mode = if report.native { "native" } else { "text" };

        let mut text = format!("{} {}\n", "Tool calling:".cyan().bold(), verdict);
        text.push_str(&format!("  Mode:      {}\n", mode));
        text.push_str(&format!("  Action:    {}\n", report.has_action));
        text.push_str(&format!("  Arguments: {}\n", report.has_arguments));
        text.push_str(&format!(
            "\n{}\n{}\n",
            "Response:".dimmed(),
            Self::indent(&report.response_text, "  ")
        ));
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &RunReactOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &RunReactOutput) -> String {
        Self::format_json(output)
    }

    fn format_answer_only(&self, output: &RunReactOutput) -> String {
        Self::format_answer_only(output)
    }
}
