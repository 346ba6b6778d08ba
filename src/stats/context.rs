//! Metric computations over the injected collaborators
//!
//! `StatsContext` owns shared handles to the ledger, block index, registry and
//! clock, so a clone can move into a cached computation. Each method loads its
//! raw inputs in one store call, so they come from a single ledger snapshot,
//! and hands them to the pure components in `crate::analysis`.

use super::clock::Clock;
use crate::analysis::distribution::{
    DISTRIBUTION_INTERVAL_DAYS, DISTRIBUTION_TOP_N, EVOLUTION_TOP_N, EVOLUTION_WINDOW_DAYS,
};
use crate::analysis::{
    BucketReducer, CapacityIndex, CostCapacitySegmenter, DistributionEvolutionComputer,
    DurationSeries, FillPolicy, HistogramBucketer, LabelledProducer, MinerStatReconciler,
    TimeseriesAggregator, TrendCalculator,
};
use crate::database::{BlockIndex, HeightSelection, LedgerStore};
use crate::errors::{AppError, AppResult};
use crate::registry::ParticipantRegistry;
use crate::types::{
    AmountStats, CategoryDatapoint, ChartDuration, CohortSide, CollateralPerGbStats,
    AskQuote, CapacityMessages, CostCapacitySegment, CostStats, HistogramBucket, LedgerMessage,
    MinerBlockCount, MinerStat, NetworkUsageSnapshot, TimeseriesPoint, METHOD_CREATE_MINER,
};
use crate::utils::currency::to_tokens;
use crate::utils::math::{mean, safe_ratio};
use crate::utils::time::{day_of, SECONDS_PER_DAY};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bytes per GB used for sector capacity (2^30)
const BYTES_PER_GB: u64 = 1 << 30;

/// Numeric parameters of the statistics engine
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSettings {
    pub sector_size_bytes: u64,
    pub token_decimals: u32,
    pub histogram_bucket_width: BigDecimal,
    pub histogram_bucket_count: u32,
    pub cohort_threshold_gb: BigDecimal,
}

impl StatsSettings {
    /// Capacity of one sector in GB
    pub fn sector_gb(&self) -> BigDecimal {
        BigDecimal::from(self.sector_size_bytes) / BigDecimal::from(BYTES_PER_GB)
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            sector_size_bytes: 268_435_456,
            token_decimals: 18,
            histogram_bucket_width: BigDecimal::from(10_000),
            histogram_bucket_count: 10,
            cohort_threshold_gb: BigDecimal::from(1_000_000),
        }
    }
}

#[derive(Clone)]
pub struct StatsContext {
    ledger: Arc<dyn LedgerStore>,
    blocks: Arc<dyn BlockIndex>,
    registry: Arc<dyn ParticipantRegistry>,
    clock: Arc<dyn Clock>,
    settings: StatsSettings,
}

impl StatsContext {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        blocks: Arc<dyn BlockIndex>,
        registry: Arc<dyn ParticipantRegistry>,
        clock: Arc<dyn Clock>,
        settings: StatsSettings,
    ) -> Self {
        Self {
            ledger,
            blocks,
            registry,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn series(&self, duration: ChartDuration) -> AppResult<DurationSeries> {
        DurationSeries::generate(duration, self.now())
    }

    // ---- historical series ----

    pub async fn historical_miner_counts(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let snapshots = self.ledger.miner_count_snapshots(window_start(&series)).await?;
        let samples: Vec<TimeseriesPoint> = snapshots
            .into_iter()
            .map(|s| TimeseriesPoint::new(s.calculated_at, BigDecimal::from(s.count)))
            .collect();
        TimeseriesAggregator::aggregate(&series, &samples, BucketReducer::Max, FillPolicy::ZeroFill)
    }

    pub async fn historical_storage_price(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let asks = self.ledger.ask_quotes(Some(window_start(&series) - 1)).await?;
        self.storage_price_series(&series, &asks)
    }

    fn storage_price_series(
        &self,
        series: &DurationSeries,
        asks: &[AskQuote],
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let samples: Vec<TimeseriesPoint> = asks
            .iter()
            .map(|ask| {
                TimeseriesPoint::new(
                    ask.ingested_at,
                    to_tokens(&ask.price, self.settings.token_decimals),
                )
            })
            .collect();
        TimeseriesAggregator::aggregate(series, &samples, BucketReducer::Mean, FillPolicy::ZeroFill)
    }

    pub async fn historical_collateral(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let creates = self.ledger.messages_by_method(METHOD_CREATE_MINER).await?;
        let samples: Vec<TimeseriesPoint> = creates
            .iter()
            .map(|m| {
                TimeseriesPoint::new(m.ingested_at, to_tokens(&m.value, self.settings.token_decimals))
            })
            .collect();
        TimeseriesAggregator::aggregate(
            &series,
            &samples,
            BucketReducer::Sum,
            FillPolicy::CumulativeSum,
        )
    }

    pub async fn historical_collateral_per_gb(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let creates = self.ledger.messages_by_method(METHOD_CREATE_MINER).await?;
        self.collateral_per_gb_series(&series, &creates)
    }

    fn collateral_per_gb_series(
        &self,
        series: &DurationSeries,
        creates: &[LedgerMessage],
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let pledges = self.pledge_samples(creates);

        let (collateral, gb): (Vec<_>, Vec<_>) = pledges
            .into_iter()
            .map(|p| {
                (
                    TimeseriesPoint::new(p.ingested_at, p.collateral),
                    TimeseriesPoint::new(p.ingested_at, p.gb),
                )
            })
            .unzip();

        let numerators = TimeseriesAggregator::bucketize(series, &collateral, BucketReducer::Sum)?;
        let denominators = TimeseriesAggregator::bucketize(series, &gb, BucketReducer::Sum)?;
        Ok(TimeseriesAggregator::combine(series, numerators, denominators))
    }

    pub async fn historical_storage_amount(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let snapshots = self.ledger.network_usage_snapshots(window_start(&series)).await?;
        let samples: Vec<TimeseriesPoint> = snapshots
            .into_iter()
            .map(|s| TimeseriesPoint::new(s.calculated_at, s.total_pledged_gb))
            .collect();
        TimeseriesAggregator::aggregate(
            &series,
            &samples,
            BucketReducer::Max,
            FillPolicy::ForwardFill,
        )
    }

    pub async fn historical_utilization(
        &self,
        duration: ChartDuration,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let series = self.series(duration)?;
        let snapshots = self.ledger.network_usage_snapshots(window_start(&series)).await?;

        let committed: Vec<TimeseriesPoint> = snapshots
            .iter()
            .map(|s| TimeseriesPoint::new(s.calculated_at, s.total_committed_gb.clone()))
            .collect();
        let pledged: Vec<TimeseriesPoint> = snapshots
            .into_iter()
            .map(|s| TimeseriesPoint::new(s.calculated_at, s.total_pledged_gb))
            .collect();

        let numerators = TimeseriesAggregator::bucketize(&series, &committed, BucketReducer::Max)?;
        let denominators = TimeseriesAggregator::bucketize(&series, &pledged, BucketReducer::Max)?;
        Ok(TimeseriesAggregator::combine(&series, numerators, denominators))
    }

    // ---- aggregate members ----

    pub async fn storage_amount_stats(&self) -> AppResult<AmountStats> {
        let data = self.historical_storage_amount(ChartDuration::Month).await?;
        Ok(AmountStats {
            total: data
                .last()
                .map(|p| p.amount.clone())
                .unwrap_or_else(BigDecimal::zero),
            trend: TrendCalculator::trend(&data),
            data,
        })
    }

    pub async fn storage_cost_stats(&self) -> AppResult<CostStats> {
        let series = self.series(ChartDuration::Month)?;
        let since = day_of(self.now().timestamp()) - 30 * SECONDS_PER_DAY;
        // One read covers both the chart window and the averaging window
        let asks = self
            .ledger
            .ask_quotes(Some(since.min(window_start(&series) - 1)))
            .await?;
        let data = self.storage_price_series(&series, &asks)?;

        let prices: Vec<BigDecimal> = asks
            .iter()
            .filter(|ask| ask.ingested_at > since)
            .map(|ask| to_tokens(&ask.price, self.settings.token_decimals))
            .collect();

        Ok(CostStats {
            average: mean(&prices),
            trend: TrendCalculator::trend(&data),
            data,
        })
    }

    pub async fn collateral_per_gb_stats(&self) -> AppResult<CollateralPerGbStats> {
        let series = self.series(ChartDuration::Month)?;
        let creates = self.ledger.messages_by_method(METHOD_CREATE_MINER).await?;
        let data = self.collateral_per_gb_series(&series, &creates)?;

        // All-time mean of the per-day collateral/GB ratio
        let mut per_day: BTreeMap<i64, (BigDecimal, BigDecimal)> = BTreeMap::new();
        for pledge in self.pledge_samples(&creates) {
            let entry = per_day.entry(day_of(pledge.ingested_at)).or_default();
            entry.0 += pledge.collateral;
            entry.1 += pledge.gb;
        }
        let ratios: Vec<BigDecimal> = per_day
            .values()
            .map(|(collateral, gb)| safe_ratio(collateral, gb))
            .collect();

        Ok(CollateralPerGbStats {
            data,
            average: mean(&ratios),
        })
    }

    pub async fn capacity_histogram(&self) -> AppResult<Vec<HistogramBucket>> {
        let capacities = self.capacity_index().await?;
        let samples: Vec<BigDecimal> = capacities.pledged().values().cloned().collect();
        HistogramBucketer::bucketize(
            &samples,
            &self.settings.histogram_bucket_width,
            self.settings.histogram_bucket_count,
        )
    }

    pub async fn cost_capacity(&self, side: CohortSide) -> AppResult<CostCapacitySegment> {
        let inputs = self.ledger.cohort_inputs().await?;
        let capacities = CapacityIndex::build(
            &inputs.capacity.create_miner,
            &inputs.capacity.commit_sector,
            &self.settings.sector_gb(),
        );
        Ok(CostCapacitySegmenter::segment(
            side,
            &self.settings.cohort_threshold_gb,
            &capacities,
            &inputs.asks,
            self.settings.token_decimals,
        ))
    }

    // ---- miners and producer shares ----

    pub async fn miners(&self) -> AppResult<Vec<MinerStat>> {
        let participants = self.registry.list_participants().await?;

        let wanted = participants.clone();
        let select: HeightSelection = Box::new(move |top_height: u64| {
            MinerStatReconciler::lookup_heights(&wanted, top_height)
        });
        let Some(snapshot) = self.blocks.chain_snapshot(select).await? else {
            warn!("Block index is empty, no miner stats available");
            return Ok(Vec::new());
        };
        let top = snapshot.top;

        let stats = MinerStatReconciler::reconcile(
            &participants,
            top.height,
            &snapshot.blocks,
            &snapshot.production.counts,
            snapshot.production.total_blocks,
        );
        debug!(
            "Reconciled {} of {} participants at top height {}",
            stats.len(),
            participants.len(),
            top.height
        );
        Ok(stats)
    }

    pub async fn distribution_over_time(&self) -> AppResult<Vec<CategoryDatapoint>> {
        try_join_all(
            DISTRIBUTION_INTERVAL_DAYS
                .into_iter()
                .map(|days| self.distribution_snapshot(days)),
        )
        .await
    }

    async fn distribution_snapshot(&self, days: i64) -> AppResult<CategoryDatapoint> {
        let since = self.now().timestamp() - days * SECONDS_PER_DAY;
        let window = self.ledger.production_window(Some(since)).await?;

        let top = DistributionEvolutionComputer::top_producers(&window.counts, DISTRIBUTION_TOP_N);
        let producers = self.label_producers(&top).await?;
        Ok(DistributionEvolutionComputer::snapshot(
            DistributionEvolutionComputer::interval_label(days),
            &producers,
            window.total_blocks,
        ))
    }

    pub async fn evolution(&self) -> AppResult<Vec<CategoryDatapoint>> {
        let now = self.now().timestamp();
        let since = now - EVOLUTION_WINDOW_DAYS * SECONDS_PER_DAY;
        let production = self.ledger.daily_production(since).await?;

        let top = DistributionEvolutionComputer::top_producers(&production.counts, EVOLUTION_TOP_N);
        let producers = self.label_producers(&top).await?;
        Ok(DistributionEvolutionComputer::evolution(
            &producers,
            &production.daily,
            day_of(now),
        ))
    }

    // ---- materialisation ----

    /// Compute current committed/pledged totals and append them as a snapshot.
    /// The totals are derived from the same read the append commits with.
    pub async fn materialize_utilization_stats(&self) -> AppResult<NetworkUsageSnapshot> {
        let sector_gb = self.settings.sector_gb();
        let calculated_at = self.now().timestamp();
        let snapshot = self
            .ledger
            .append_network_usage(Box::new(move |messages: CapacityMessages| -> AppResult<_> {
                let capacities =
                    CapacityIndex::build(&messages.create_miner, &messages.commit_sector, &sector_gb);
                Ok(NetworkUsageSnapshot {
                    total_committed_gb: capacities.total_committed_gb(),
                    total_pledged_gb: capacities.total_pledged_gb(),
                    calculated_at,
                })
            }))
            .await?;

        info!(
            "Materialised network usage: committed={} GB pledged={} GB",
            snapshot.total_committed_gb, snapshot.total_pledged_gb
        );
        Ok(snapshot)
    }

    // ---- shared loaders ----

    async fn capacity_index(&self) -> AppResult<CapacityIndex> {
        let messages = self.ledger.capacity_messages().await?;
        Ok(CapacityIndex::build(
            &messages.create_miner,
            &messages.commit_sector,
            &self.settings.sector_gb(),
        ))
    }

    /// Resolve nicknames concurrently, then label in rank order
    async fn label_producers(&self, top: &[MinerBlockCount]) -> AppResult<Vec<LabelledProducer>> {
        let lookups = top.iter().map(|producer| {
            let registry = Arc::clone(&self.registry);
            let address = producer.address.clone();
            async move {
                let participant = registry.participant_by_address(&address).await?;
                Ok::<_, AppError>(participant.map(|p| p.nickname))
            }
        });
        let nicknames = try_join_all(lookups).await?;
        Ok(DistributionEvolutionComputer::assign_labels(top, &nicknames))
    }

    /// Collateral (tokens) and pledged GB of each well-formed `createMiner`
    fn pledge_samples(&self, creates: &[LedgerMessage]) -> Vec<PledgeSample> {
        let sector_gb = self.settings.sector_gb();
        creates
            .iter()
            .filter_map(|message| match message.param_decimal(0) {
                Some(sectors) => Some(PledgeSample {
                    ingested_at: message.ingested_at,
                    collateral: to_tokens(&message.value, self.settings.token_decimals),
                    gb: sectors * &sector_gb,
                }),
                None => {
                    warn!(
                        message_id = message.id,
                        address = %message.from_address,
                        "Skipping createMiner message without a sector count"
                    );
                    None
                }
            })
            .collect()
    }
}

struct PledgeSample {
    ingested_at: i64,
    collateral: BigDecimal,
    gb: BigDecimal,
}

/// First boundary of the series (an empty series cannot occur for a valid span)
fn window_start(series: &DurationSeries) -> i64 {
    series.start().unwrap_or(0)
}
