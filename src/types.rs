//! Storage Network Statistics - Type System
//!
//! - `timeseries`: Durations, granularities and dated points
//! - `ledger`: Rows read from the historical chain ledger
//! - `participant`: Live registry entries and reconciled miner stats
//! - `statistics`: Histogram, category, cohort and aggregate response types

pub mod ledger;
pub mod participant;
pub mod statistics;
pub mod timeseries;

pub use ledger::{
    AskQuote, BlockRecord, CapacityMessages, ChainSnapshot, CohortInputs, DailyBlockCount,
    DailyProduction, LedgerMessage, MinerBlockCount, MinerCountSnapshot, NetworkUsageSnapshot,
    ProductionWindow, METHOD_COMMIT_SECTOR, METHOD_CREATE_MINER,
};
pub use participant::{MinerStat, Participant};
pub use statistics::{
    AmountStats, CategoryDatapoint, CohortSide, CollateralPerGbStats, CostCapacitySegment,
    CostStats, HistogramBucket, StorageStats, OTHER_CATEGORY,
};
pub use timeseries::{ChartDuration, Granularity, TimeseriesPoint};
