use crate::errors::{AppError, AppResult};
use crate::stats::StatsSettings;
use crate::utils::math::parse_decimal;
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub registry: RegistryConfig,
    pub cache: CacheConfig,
    pub stats: StatsConfig,
    pub materialize: MaterializeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Live registry listing (JSON array of participants)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub snapshot_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

/// Numeric engine parameters. Decimal values are strings so they stay exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    pub sector_size_bytes: u64,
    pub token_decimals: u32,
    pub histogram_bucket_width: String,
    pub histogram_bucket_count: u32,
    pub cohort_threshold_gb: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializeConfig {
    pub interval_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                path: PathBuf::from("./data/ledger.db"),
            },
            registry: RegistryConfig {
                snapshot_path: PathBuf::from("./data/registry.json"),
            },
            cache: CacheConfig { ttl_seconds: 60 },
            stats: StatsConfig {
                sector_size_bytes: 268_435_456,
                token_decimals: 18,
                histogram_bucket_width: "10000".to_string(),
                histogram_bucket_count: 10,
                cohort_threshold_gb: "1000000".to_string(),
            },
            materialize: MaterializeConfig {
                interval_seconds: 300,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Config::builder()
            // Start with default values
            .set_default(
                "database.path",
                defaults.database.path.to_string_lossy().to_string(),
            )?
            .set_default(
                "registry.snapshot_path",
                defaults.registry.snapshot_path.to_string_lossy().to_string(),
            )?
            .set_default("cache.ttl_seconds", defaults.cache.ttl_seconds as i64)?
            .set_default(
                "stats.sector_size_bytes",
                defaults.stats.sector_size_bytes as i64,
            )?
            .set_default("stats.token_decimals", defaults.stats.token_decimals as i64)?
            .set_default(
                "stats.histogram_bucket_width",
                defaults.stats.histogram_bucket_width,
            )?
            .set_default(
                "stats.histogram_bucket_count",
                defaults.stats.histogram_bucket_count as i64,
            )?
            .set_default("stats.cohort_threshold_gb", defaults.stats.cohort_threshold_gb)?
            .set_default(
                "materialize.interval_seconds",
                defaults.materialize.interval_seconds as i64,
            )?
            // Load from config.toml if it exists
            .add_source(File::with_name("config").required(false))
            // STORAGE_STATS_DATABASE__PATH, STORAGE_STATS_CACHE__TTL_SECONDS, ...
            .add_source(
                config::Environment::with_prefix("STORAGE_STATS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get default config values for CLI argument defaults
    pub fn get_defaults() -> Self {
        // Try to load config for defaults, but don't fail if not found
        Self::load().unwrap_or_default()
    }

    /// Exact-decimal engine settings
    pub fn stats_settings(&self) -> AppResult<StatsSettings> {
        if self.stats.histogram_bucket_count == 0 {
            return Err(AppError::Config(
                "stats.histogram_bucket_count must be at least 1".to_string(),
            ));
        }
        Ok(StatsSettings {
            sector_size_bytes: self.stats.sector_size_bytes,
            token_decimals: self.stats.token_decimals,
            histogram_bucket_width: parse_decimal(
                &self.stats.histogram_bucket_width,
                "stats.histogram_bucket_width",
            )?,
            histogram_bucket_count: self.stats.histogram_bucket_count,
            cohort_threshold_gb: parse_decimal(
                &self.stats.cohort_threshold_gb,
                "stats.cohort_threshold_gb",
            )?,
        })
    }
}
