//! QuantaSynapse demo harness.
//!
//! Commands:
//! - `run`     — Subscribe, connect, publish a greeting, watch heartbeats, disconnect
//! - `config`  — Print the effective (or default) settings as TOML

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quanta",
    about = "QuantaSynapse — in-process messaging facade demo",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to $QUANTA_CONFIG or ./quanta.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the publish/subscribe and heartbeat demo
    Run {
        /// How long to observe heartbeats before disconnecting
        #[arg(short, long, default_value_t = 12)]
        duration_secs: u64,

        /// Override the heartbeat interval
        #[arg(long)]
        heartbeat_ms: Option<u64>,

        /// Print received signals as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print settings as TOML
    Config {
        /// Print built-in defaults instead of the loaded settings
        #[arg(long)]
        defaults: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            duration_secs,
            heartbeat_ms,
            json,
        } => commands::run::run(cli.config, duration_secs, heartbeat_ms, json).await?,
        Commands::Config { defaults } => commands::config_cmd::run(cli.config, defaults)?,
    }

    Ok(())
}
