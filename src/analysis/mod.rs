//! Statistics aggregation components
//!
//! Every component here is a pure function of already-loaded ledger and
//! registry data. `crate::stats` gathers the inputs and composes them:
//!
//! - **Duration series** - bucket boundaries for a chart span
//! - **Timeseries aggregation** - sparse samples to dense, gap-filled series
//! - **Histogram** - fixed-width capacity buckets plus overflow
//! - **Capacity index** - pledged / committed GB per participant
//! - **Miner reconciliation** - live registry joined with block history
//! - **Distribution / evolution** - producer shares over trailing windows
//! - **Cost / capacity cohorts** - averages either side of a capacity threshold
//! - **Trend** - relative change of a series' last two points

pub mod capacity;
pub mod cost_capacity;
pub mod distribution;
pub mod duration_series;
pub mod histogram;
pub mod miner_stats;
pub mod timeseries;
pub mod trend;

pub use capacity::CapacityIndex;
pub use cost_capacity::CostCapacitySegmenter;
pub use distribution::{DistributionEvolutionComputer, LabelledProducer};
pub use duration_series::DurationSeries;
pub use histogram::HistogramBucketer;
pub use miner_stats::MinerStatReconciler;
pub use timeseries::{BucketReducer, FillPolicy, TimeseriesAggregator};
pub use trend::TrendCalculator;
