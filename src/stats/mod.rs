//! Storage statistics facade
//!
//! `StatsFacade` is the entry point used by the CLI. Every exposed metric is
//! computed by `StatsContext` through the single-flight cache under its own
//! key, so one metric can be refreshed (or fail) without touching the others.
//! `get_stats` fetches all members concurrently; one failing member fails the
//! whole aggregate.
//!
//! `materialize_utilization_stats` is the only write path and bypasses the
//! cache.

pub mod clock;
pub mod context;
pub mod metrics;

pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{StatsContext, StatsSettings};
pub use metrics::HistoricalMetric;

use crate::cache::SingleFlightCache;
use crate::errors::AppResult;
use crate::types::{
    ChartDuration, CohortSide, CostCapacitySegment, MinerStat, NetworkUsageSnapshot,
    StorageStats, TimeseriesPoint,
};
use metrics::{
    KEY_CAPACITY_HISTOGRAM, KEY_COST_CAPACITY, KEY_DISTRIBUTION_OVER_TIME, KEY_EVOLUTION,
    KEY_HISTORICAL_COLLATERAL, KEY_HISTORICAL_COLLATERAL_PER_GB, KEY_HISTORICAL_MINER_COUNTS,
    KEY_MINERS, KEY_NETWORK_UTILIZATION, KEY_STORAGE_AMOUNT, KEY_STORAGE_COST,
};
use std::future::Future;
use std::sync::Arc;

pub struct StatsFacade {
    ctx: StatsContext,
    cache: Arc<SingleFlightCache>,
}

impl StatsFacade {
    pub fn new(ctx: StatsContext, cache: Arc<SingleFlightCache>) -> Self {
        Self { ctx, cache }
    }

    pub fn context(&self) -> &StatsContext {
        &self.ctx
    }

    async fn cached<T, F, Fut>(&self, key: &str, compute: F) -> AppResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(StatsContext) -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let ctx = self.ctx.clone();
        self.cache.wrap(key, move || compute(ctx)).await
    }

    pub async fn get_stats(&self) -> AppResult<StorageStats> {
        let (
            storage_amount,
            storage_cost,
            historical_collateral,
            historical_collateral_per_gb,
            historical_miner_counts,
            capacity_histogram,
            miners,
            network_utilization,
            distribution_over_time,
            evolution,
            below,
            at_or_above,
        ) = futures::try_join!(
            self.cached(KEY_STORAGE_AMOUNT, |ctx| async move {
                ctx.storage_amount_stats().await
            }),
            self.cached(KEY_STORAGE_COST, |ctx| async move {
                ctx.storage_cost_stats().await
            }),
            self.cached(KEY_HISTORICAL_COLLATERAL, |ctx| async move {
                ctx.historical_collateral(ChartDuration::Month).await
            }),
            self.cached(KEY_HISTORICAL_COLLATERAL_PER_GB, |ctx| async move {
                ctx.collateral_per_gb_stats().await
            }),
            self.cached(KEY_HISTORICAL_MINER_COUNTS, |ctx| async move {
                ctx.historical_miner_counts(ChartDuration::Month).await
            }),
            self.cached(KEY_CAPACITY_HISTOGRAM, |ctx| async move {
                ctx.capacity_histogram().await
            }),
            self.get_miner_stats(),
            self.cached(KEY_NETWORK_UTILIZATION, |ctx| async move {
                ctx.historical_utilization(ChartDuration::Month).await
            }),
            self.cached(KEY_DISTRIBUTION_OVER_TIME, |ctx| async move {
                ctx.distribution_over_time().await
            }),
            self.cached(KEY_EVOLUTION, |ctx| async move { ctx.evolution().await }),
            self.cost_capacity(CohortSide::Below),
            self.cost_capacity(CohortSide::AtOrAbove),
        )?;

        Ok(StorageStats {
            storage_amount,
            storage_cost,
            historical_collateral,
            historical_collateral_per_gb,
            historical_miner_counts,
            capacity_histogram,
            miners,
            network_utilization,
            distribution_over_time,
            evolution,
            cost_capacity_by_size: [below, at_or_above],
        })
    }

    pub async fn get_miner_stats(&self) -> AppResult<Vec<MinerStat>> {
        self.cached(KEY_MINERS, |ctx| async move { ctx.miners().await })
            .await
    }

    async fn cost_capacity(&self, side: CohortSide) -> AppResult<CostCapacitySegment> {
        let key = match side {
            CohortSide::Below => KEY_COST_CAPACITY[0],
            CohortSide::AtOrAbove => KEY_COST_CAPACITY[1],
        };
        self.cached(key, move |ctx| async move { ctx.cost_capacity(side).await })
            .await
    }

    /// One historical series, cached per metric and duration
    pub async fn historical(
        &self,
        metric: HistoricalMetric,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let key = metric.cache_key(duration);
        self.cached(&key, move |ctx| async move {
            match metric {
                HistoricalMetric::MinerCounts => ctx.historical_miner_counts(duration).await,
                HistoricalMetric::StoragePrice => ctx.historical_storage_price(duration).await,
                HistoricalMetric::Collateral => ctx.historical_collateral(duration).await,
                HistoricalMetric::CollateralPerGb => {
                    ctx.historical_collateral_per_gb(duration).await
                }
                HistoricalMetric::StorageAmount => ctx.historical_storage_amount(duration).await,
                HistoricalMetric::Utilization => ctx.historical_utilization(duration).await,
            }
        })
        .await
    }

    pub async fn historical_miner_count_stats(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::MinerCounts, duration).await
    }

    pub async fn historical_storage_price(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::StoragePrice, duration).await
    }

    pub async fn historical_collateral(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::Collateral, duration).await
    }

    pub async fn historical_collateral_per_gb(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::CollateralPerGb, duration).await
    }

    pub async fn historical_storage_amount(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::StorageAmount, duration).await
    }

    pub async fn historical_utilization(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        self.historical(HistoricalMetric::Utilization, duration).await
    }

    /// Append a network-usage snapshot computed now. Not cached.
    pub async fn materialize_utilization_stats(&self) -> AppResult<NetworkUsageSnapshot> {
        self.ctx.materialize_utilization_stats().await
    }
}
