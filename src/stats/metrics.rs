//! Historical metric catalogue and cache keys

use crate::types::ChartDuration;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KEY_STORAGE_AMOUNT: &str = "storage-stats-storage-amount";
pub const KEY_STORAGE_COST: &str = "storage-stats-storage-cost";
pub const KEY_HISTORICAL_COLLATERAL: &str = "storage-stats-historical-collateral";
pub const KEY_HISTORICAL_COLLATERAL_PER_GB: &str = "storage-stats-historical-collateral-per-gb";
pub const KEY_HISTORICAL_MINER_COUNTS: &str = "storage-stats-historical-miner-counts";
pub const KEY_CAPACITY_HISTOGRAM: &str = "storage-stats-capacity-histogram";
pub const KEY_MINERS: &str = "storage-stats-miners";
pub const KEY_NETWORK_UTILIZATION: &str = "storage-stats-network-utilization";
pub const KEY_DISTRIBUTION_OVER_TIME: &str = "storage-stats-distribution-over-time";
pub const KEY_EVOLUTION: &str = "storage-stats-evolution";
/// Indexed by cohort: below threshold, at or above threshold
pub const KEY_COST_CAPACITY: [&str; 2] = ["storage-stats-cost-capacity-0", "storage-stats-cost-capacity-1"];

/// A series available through the historical accessors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HistoricalMetric {
    MinerCounts,
    StoragePrice,
    Collateral,
    CollateralPerGb,
    StorageAmount,
    Utilization,
}

impl HistoricalMetric {
    pub const ALL: [HistoricalMetric; 6] = [
        HistoricalMetric::MinerCounts,
        HistoricalMetric::StoragePrice,
        HistoricalMetric::Collateral,
        HistoricalMetric::CollateralPerGb,
        HistoricalMetric::StorageAmount,
        HistoricalMetric::Utilization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HistoricalMetric::MinerCounts => "miner-counts",
            HistoricalMetric::StoragePrice => "storage-price",
            HistoricalMetric::Collateral => "collateral",
            HistoricalMetric::CollateralPerGb => "collateral-per-gb",
            HistoricalMetric::StorageAmount => "storage-amount",
            HistoricalMetric::Utilization => "utilization",
        }
    }

    pub fn cache_key(self, duration: ChartDuration) -> String {
        format!("storage-stats-historical-{}-{}", self, duration)
    }
}

impl fmt::Display for HistoricalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
