//! lexlink CLI
//!
//! Main entry point for the lexlink binary: runs the HTTP API or harvests
//! the SAP glossary.

mod commands;

use clap::{Parser, Subcommand};
use commands::{HarvestCommand, ServeCommand};
use lexlink_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// lexlink - question answering and entity linking over SAP and Wikipedia sources
#[derive(Parser, Debug)]
#[command(name = "lexlink")]
#[command(about = "Question answering and entity linking backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "LEXLINK_CONFIG")]
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

    /// LLM provider (openai, openai-compatible)
    #[arg(short, long, global = true, env = "LEXLINK_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "LEXLINK_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeCommand),

    /// Download the SAP glossary into a JSON file
    Harvest(HarvestCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.json_logs)?;

    tracing::info!("lexlink starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Harvest(_) => "harvest",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Harvest(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
