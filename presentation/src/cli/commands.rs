//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Full transcript with tool calls
    Full,
    /// JSON output
    Json,
}

/// CLI arguments for toolbox-agent
#[derive(Parser, Debug)]
#[command(name = "toolbox-agent")]
#[command(author, version, about = "ReAct tool-calling agent and MCP tool server")]
#[command(long_about = r#"
toolbox-agent answers a question by letting a language model call tools.

Each iteration the model either calls a tool (Action / Action Input) or
gives the final answer (Answer:). Tool results are fed back as observations
until an answer is produced or the iteration budget runs out.

With --serve the same tools are exposed to MCP clients over stdio instead.

Configuration files are loaded from (in priority order):
1. TOOLBOX_* environment variables (e.g. TOOLBOX_BACKEND__MODEL)
2. --config <path>     Explicit config file
3. ./toolbox.toml      Project-level config
4. ~/.config/toolbox-agent/config.toml   Global config

Example:
  toolbox-agent "What is (17 + 25) * 3?"
  toolbox-agent --model qwen2.5 --base-url http://localhost:11434/v1 "Weather in Paris?"
  toolbox-agent --serve
"#)]
pub struct Cli {
    /// The question to answer (not required with --serve, --list-tools or --probe)
    pub query: Option<String>,

    /// Serve the tool registry over MCP stdio instead of running a query
    #[arg(long)]
    pub serve: bool,

    /// List the registered tools and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Check whether the backend produces parseable tool calls and exit
    #[arg(long)]
    pub probe: bool,

    /// Model name (overrides backend.model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// OpenAI-compatible API root (overrides backend.base_url)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum think-act-observe iterations (overrides agent.max_iterations)
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Advertise tools for native function calling
    #[arg(long)]
    pub native_tools: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Tracing filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
