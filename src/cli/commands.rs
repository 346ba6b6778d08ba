//! Subcommands and the wiring they share

pub mod historical;
pub mod materialize;
pub mod miners;
pub mod stats;

use crate::cache::SingleFlightCache;
use crate::config::AppConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::registry::InMemoryRegistry;
use crate::stats::{StatsContext, StatsFacade, SystemClock};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Data source overrides accepted by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Ledger database path (overrides config.toml)
    #[arg(long)]
    pub database_path: Option<PathBuf>,

    /// Registry snapshot path (overrides config.toml)
    #[arg(long)]
    pub registry_path: Option<PathBuf>,
}

/// Load configuration, falling back to defaults when it cannot be read
pub fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            info!("Using default configuration");
            AppConfig::default()
        }
    }
}

/// Build the statistics facade over the configured ledger and registry
pub fn build_facade(sources: &SourceArgs, config: &AppConfig) -> AppResult<StatsFacade> {
    let database_path = sources
        .database_path
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    let registry_path = sources
        .registry_path
        .clone()
        .unwrap_or_else(|| config.registry.snapshot_path.clone());

    info!("Ledger database: {:?}", database_path);
    info!("Registry snapshot: {:?}", registry_path);

    let database_path_str = database_path
        .to_str()
        .ok_or_else(|| AppError::Config("Invalid database path".to_string()))?;
    let database = Arc::new(Database::new(database_path_str)?);
    let registry = Arc::new(InMemoryRegistry::from_json_file(&registry_path)?);

    let ctx = StatsContext::new(
        database.clone(),
        database,
        registry,
        Arc::new(SystemClock),
        config.stats_settings()?,
    );
    let cache = SingleFlightCache::new(Duration::from_secs(config.cache.ttl_seconds));
    Ok(StatsFacade::new(ctx, Arc::new(cache)))
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
