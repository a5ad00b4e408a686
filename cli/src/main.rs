//! CLI entrypoint for toolbox-agent
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use toolbox_application::{
    ConversationLogger, LlmGateway, RunReactInput, RunReactUseCase, ToolExecutorPort,
    ToolProtocolAdapter,
};
use toolbox_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiCompatGateway, RegistryToolExecutor,
    StdioServer, assemble_registry,
};
use toolbox_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries results, or MCP frames with --serve.
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    info!("Starting toolbox-agent");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    if !issues.is_empty() {
        let list = issues
            .iter()
            .map(|i| format!("  - {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Invalid configuration:\n{}", list);
    }

    // === Dependency Injection ===
    let registry = Arc::new(assemble_registry(&config.tools).context("Failed to load tools")?);
    let mut executor = RegistryToolExecutor::new(registry);
    if let Some(timeout) = config.tools.timeout() {
        executor = executor.with_timeout(timeout);
    }
    let executor: Arc<dyn ToolExecutorPort> = Arc::new(executor);

    if cli.list_tools {
        print!("{}", ConsoleFormatter::format_tools(&executor.tool_descriptors()));
        return Ok(());
    }

    if cli.serve {
        let server = StdioServer::new(ToolProtocolAdapter::new(executor));
        server.run_stdio().await.context("MCP server failed")?;
        return Ok(());
    }

    let gateway = Arc::new(OpenAiCompatGateway::new(config.backend.to_openai_config())?);

    if cli.show_config {
        show_config(&cli, &config, gateway.as_ref()).await;
        return Ok(());
    }

    let mut use_case = RunReactUseCase::new(gateway, executor);
    if let Some(path) = &config.agent.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!(path = %logger.path().display(), "Conversation log enabled");
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                use_case = use_case.with_conversation_logger(logger);
            }
            None => warn!(path = %path.display(), "Conversation log disabled"),
        }
    }

    if cli.probe {
        let report = use_case.probe_tool_calling(config.agent.native_tools).await?;
        print!("{}", ConsoleFormatter::format_probe(&report));
        return Ok(());
    }

    // Single query mode - query is required
    let Some(query) = cli.query.clone() else {
        bail!("A query is required. Use --serve to run as an MCP tool server.");
    };

    let input = RunReactInput::new(query).with_execution(config.agent.to_execution_params());

    let progress = ProgressMode::detect(cli.quiet, std::io::stderr().is_terminal()).notifier();
    let output = use_case.execute(input, progress.as_ref()).await?;

    let text = match cli.output {
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&output),
        OutputFormat::Full => ConsoleFormatter::format(&output),
        OutputFormat::Json => ConsoleFormatter::format_json(&output),
    };
    println!("{}", text);

    Ok(())
}

/// CLI flags take precedence over every configuration source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(model) = &cli.model {
        config.backend.model = model.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(max) = cli.max_iterations {
        config.agent.max_iterations = max;
    }
    if cli.native_tools {
        config.agent.native_tools = true;
    }
}

async fn show_config(cli: &Cli, config: &FileConfig, gateway: &dyn LlmGateway) {
    for line in ConfigLoader::describe_sources(cli.config.as_ref()) {
        println!("{}", line);
    }

    println!();
    println!("Effective settings:");
    println!("  backend.base_url       = {}", config.backend.base_url);
    println!("  backend.model          = {}", config.backend.model);
    println!("  agent.max_iterations   = {}", config.agent.max_iterations);
    println!("  agent.native_tools     = {}", config.agent.native_tools);
    println!("  tools.builtin          = {}", config.tools.builtin);
    if let Some(catalogue) = &config.tools.catalogue {
        println!("  tools.catalogue        = {}", catalogue.display());
    }

    println!();
    match gateway.available_models().await {
        Ok(models) if models.is_empty() => println!("Backend reachable (no models listed)"),
        Ok(models) => println!("Backend reachable, models: {}", models.join(", ")),
        Err(e) => println!("Backend not reachable: {}", e),
    }
}
