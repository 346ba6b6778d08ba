//! Collaborator trait abstractions for the historical ledger.
//!
//! The statistics engine only reads through these seams (plus one append for
//! network-usage snapshots). Implementations filter, join and count rows; all
//! decimal aggregation happens in the engine so amounts stay exact.
//!
//! Methods returning several row sets read them from one consistent snapshot.

use crate::errors::AppResult;
use crate::types::{
    AskQuote, BlockRecord, CapacityMessages, ChainSnapshot, CohortInputs, DailyProduction,
    LedgerMessage, MinerCountSnapshot, NetworkUsageSnapshot, ProductionWindow,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Turns the capacity messages into the snapshot to append
pub type UsageCalculation =
    Box<dyn FnOnce(CapacityMessages) -> AppResult<NetworkUsageSnapshot> + Send>;

/// Picks the block heights to fetch given the top height
pub type HeightSelection = Box<dyn FnOnce(u64) -> BTreeSet<u64> + Send>;

/// Read-mostly query surface over messages, blocks, asks and snapshots
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All messages with the given method, joined with their block's ingestion time
    async fn messages_by_method(&self, method: &str) -> AppResult<Vec<LedgerMessage>>;

    /// Every `createMiner` and `commitSector` message
    async fn capacity_messages(&self) -> AppResult<CapacityMessages>;

    /// Capacity messages together with every ask quote
    async fn cohort_inputs(&self) -> AppResult<CohortInputs>;

    /// Ask quotes, optionally only those whose block was ingested after `since`
    async fn ask_quotes(&self, since: Option<i64>) -> AppResult<Vec<AskQuote>>;

    /// Block production per non-empty miner address plus the total block
    /// count (any miner), optionally only blocks ingested after `since`
    async fn production_window(&self, since: Option<i64>) -> AppResult<ProductionWindow>;

    /// Per-miner totals and per-day, per-miner block counts for blocks
    /// ingested after `since`. Daily rows report blocks without a miner under
    /// the empty address so day totals remain complete.
    async fn daily_production(&self, since: i64) -> AppResult<DailyProduction>;

    /// Network-usage snapshots calculated at or after `since`
    async fn network_usage_snapshots(&self, since: i64) -> AppResult<Vec<NetworkUsageSnapshot>>;

    /// Miner-count snapshots calculated at or after `since`
    async fn miner_count_snapshots(&self, since: i64) -> AppResult<Vec<MinerCountSnapshot>>;

    /// Read the capacity messages, derive a snapshot with `calculate` and
    /// append it, all in one transaction
    async fn append_network_usage(
        &self,
        calculate: UsageCalculation,
    ) -> AppResult<NetworkUsageSnapshot>;
}

/// Lookup of canonical blocks by height
#[async_trait]
pub trait BlockIndex: Send + Sync {
    /// Highest block, `None` on an empty chain
    async fn top_block(&self) -> AppResult<Option<BlockRecord>>;

    /// Blocks at the requested heights; missing heights are simply absent
    async fn blocks_at_heights(&self, heights: &BTreeSet<u64>) -> AppResult<Vec<BlockRecord>>;

    /// Top block, the blocks at the heights `select` picks from the top
    /// height, and all-time production, read together. `None` on an empty chain.
    async fn chain_snapshot(&self, select: HeightSelection) -> AppResult<Option<ChainSnapshot>>;
}
