use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Storage Network Statistics Engine
#[derive(Parser)]
#[command(name = "storage-network-stats")]
#[command(about = "Storage network statistics from the miner registry and chain ledger")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Compute the full storage statistics aggregate
    Stats(commands::stats::StatsCommand),
    /// Reconcile live miners with the block index
    Miners(commands::miners::MinersCommand),
    /// Compute one historical series for a chart duration
    Historical(commands::historical::HistoricalCommand),
    /// Write network-usage snapshots
    Materialize(commands::materialize::MaterializeCommand),
}

pub async fn run() -> AppResult<()> {
    // Initialise tracing subscriber to capture info!() macros
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats(command) => command.run().await,
        Commands::Miners(command) => command.run().await,
        Commands::Historical(command) => command.run().await,
        Commands::Materialize(command) => command.run().await,
    }
}
