//! dishook - Discord webhook message composer
//!
//! Compose plain or embed messages, optionally with a file, and send them to
//! a Discord webhook.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::history::HistoryCommand;
use commands::interactive::InteractiveCommand;
use commands::send::SendCommand;
use dishook_composer::AppConfig;
use dishook_observability::{init_logging, level_from_env, LogFormat};
use std::path::PathBuf;
use tracing::{debug, Level};

#[derive(Debug, Parser)]
#[command(name = "dishook", version, about)]
struct Cli {
    /// Configuration file (overrides DISHOOK_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a single message
    Send(SendCommand),
    /// Manage remembered webhooks
    History(HistoryCommand),
    /// Compose messages interactively
    Interactive(InteractiveCommand),
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path),
        None => AppConfig::from_env(),
    };
    config.context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LogFormat::from_env(), level_from_env(Level::WARN));

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    debug!(?config, "Loaded configuration");

    match &cli.command {
        Command::Send(cmd) => cmd.run(&config).await,
        Command::History(cmd) => cmd.run(&config),
        Command::Interactive(cmd) => cmd.run(&config).await,
    }
}
