//! Rows read from the historical ledger (messages, blocks, asks, snapshots)

use crate::utils::math::decimal_from_json;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Message registering a participant and pledging sectors
pub const METHOD_CREATE_MINER: &str = "createMiner";

/// Message committing (sealing) one sector
pub const METHOD_COMMIT_SECTOR: &str = "commitSector";

/// A chain message joined with the ingestion time of its block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMessage {
    pub id: i64,
    pub height: u64,
    pub method: String,
    pub params: Vec<serde_json::Value>,
    /// Transferred value in base units
    pub value: BigDecimal,
    pub from_address: String,
    pub to_address: String,
    pub ingested_at: i64,
}

impl LedgerMessage {
    /// Positional parameter as a decimal
    pub fn param_decimal(&self, index: usize) -> Option<BigDecimal> {
        self.params.get(index).and_then(decimal_from_json)
    }

    /// Positional parameter as an identifier string, numbers rendered canonically
    pub fn param_key(&self, index: usize) -> Option<String> {
        match self.params.get(index)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A storage ask joined with its message sender and block time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskQuote {
    pub message_id: i64,
    /// Ask price in base units
    pub price: BigDecimal,
    pub from_address: String,
    pub ingested_at: i64,
}

/// A block as held in the block index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub height: u64,
    pub miner: String,
    pub parent_hashes: Vec<String>,
    pub ingested_at: i64,
}

/// Blocks produced by one miner address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerBlockCount {
    pub address: String,
    pub blocks_mined: u64,
    pub last_block_height: u64,
}

/// Blocks produced by one miner address during one UTC day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBlockCount {
    /// Day start, Unix epoch seconds
    pub day: i64,
    pub address: String,
    pub count: u64,
}

/// Materialised network-wide capacity totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkUsageSnapshot {
    #[serde(rename = "totalCommittedGB")]
    pub total_committed_gb: BigDecimal,
    #[serde(rename = "totalPledgedGB")]
    pub total_pledged_gb: BigDecimal,
    pub calculated_at: i64,
}

/// Externally materialised count of registered miners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerCountSnapshot {
    pub count: u64,
    pub calculated_at: i64,
}

/// Block production over one window, read from a single snapshot.
/// `total_blocks` also counts blocks without a known miner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductionWindow {
    pub counts: Vec<MinerBlockCount>,
    pub total_blocks: u64,
}

/// Per-miner totals and per-day counts over the same window
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DailyProduction {
    pub counts: Vec<MinerBlockCount>,
    pub daily: Vec<DailyBlockCount>,
}

/// Every registration and sector commitment, read together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapacityMessages {
    pub create_miner: Vec<LedgerMessage>,
    pub commit_sector: Vec<LedgerMessage>,
}

/// Capacity messages plus every ask quote, read together
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CohortInputs {
    pub capacity: CapacityMessages,
    pub asks: Vec<AskQuote>,
}

/// Top block, the blocks at the requested heights and all-time production,
/// read together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    pub top: BlockRecord,
    pub blocks: Vec<BlockRecord>,
    pub production: ProductionWindow,
}
