//! Derived statistics returned to the presentation layer

use super::participant::MinerStat;
use super::timeseries::TimeseriesPoint;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label of the residual share in a distribution snapshot
pub const OTHER_CATEGORY: &str = "Other";

/// One histogram bucket; `range_end == 0` marks the unbounded overflow bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBucket {
    pub index: u32,
    pub range_start: BigDecimal,
    pub range_end: BigDecimal,
    pub count: u64,
}

impl HistogramBucket {
    pub fn is_overflow(&self) -> bool {
        self.range_end == BigDecimal::from(0)
    }
}

/// Shares of participants within one category (interval name or day)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDatapoint {
    pub category: String,
    pub data: BTreeMap<String, BigDecimal>,
}

/// Which side of the capacity threshold a cohort covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CohortSide {
    Below,
    AtOrAbove,
}

impl CohortSide {
    pub fn contains(self, capacity_gb: &BigDecimal, threshold_gb: &BigDecimal) -> bool {
        match self {
            CohortSide::Below => capacity_gb < threshold_gb,
            CohortSide::AtOrAbove => capacity_gb >= threshold_gb,
        }
    }
}

/// Price / capacity / utilisation averages for one cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCapacitySegment {
    pub count: u64,
    pub average_storage_price: BigDecimal,
    #[serde(rename = "averageCapacityGB")]
    pub average_capacity_gb: BigDecimal,
    pub utilization: BigDecimal,
}

impl CostCapacitySegment {
    pub fn empty() -> Self {
        Self {
            count: 0,
            average_storage_price: BigDecimal::from(0),
            average_capacity_gb: BigDecimal::from(0),
            utilization: BigDecimal::from(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountStats {
    pub total: BigDecimal,
    pub trend: BigDecimal,
    pub data: Vec<TimeseriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostStats {
    pub average: BigDecimal,
    pub trend: BigDecimal,
    pub data: Vec<TimeseriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralPerGbStats {
    pub data: Vec<TimeseriesPoint>,
    pub average: BigDecimal,
}

/// Complete storage statistics response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub storage_amount: AmountStats,
    pub storage_cost: CostStats,
    pub historical_collateral: Vec<TimeseriesPoint>,
    #[serde(rename = "historicalCollateralPerGB")]
    pub historical_collateral_per_gb: CollateralPerGbStats,
    pub historical_miner_counts: Vec<TimeseriesPoint>,
    pub capacity_histogram: Vec<HistogramBucket>,
    pub miners: Vec<MinerStat>,
    pub network_utilization: Vec<TimeseriesPoint>,
    pub distribution_over_time: Vec<CategoryDatapoint>,
    pub evolution: Vec<CategoryDatapoint>,
    /// `[below threshold, at or above threshold]`
    pub cost_capacity_by_size: [CostCapacitySegment; 2],
}
