//! Ragline CLI
//!
//! Main entry point for the ragline command-line tool.
//! Submits documents to a hosted retrieval service and answers questions
//! grounded in the retrieved passages.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, StatusCommand};
use ragline_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// Ragline - retrieval-augmented answers over hosted documents
#[derive(Parser, Debug)]
#[command(name = "ragline")]
#[command(about = "Retrieval-augmented answers over hosted documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RAGLINE_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RAGLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Generation model identifier
    #[arg(short, long, global = true, env = "RAGLINE_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a document URL for indexing
    Ingest(IngestCommand),

    /// Answer a question from indexed documents
    Ask(AskCommand),

    /// Show the indexing status of a submitted document
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace.clone(), cli.config.clone())
        .context("Failed to load configuration")?;

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        None,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    commands::check_config(&config)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Retrieval service: {}", config.retrieval.base_url);
    tracing::debug!(
        "Generation: {} / {}",
        config.generation.provider,
        config.generation.model
    );

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Status(_) => "status",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(config).await,
        Commands::Status(cmd) => cmd.execute(&config).await,
    };

    match result {
        Ok(()) => {
            tracing::info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), "Command failed: {}", e);
            let stage = e.stage();
            Err(anyhow::Error::new(e).context(format!("{} stage failed", stage)))
        }
    }
}
