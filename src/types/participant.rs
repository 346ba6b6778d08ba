use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// A participant as reported by the live registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub address: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub peer_id: String,
    pub power: BigDecimal,
    pub capacity: BigDecimal,
    /// Last chain height the node reported
    pub height: u64,
    /// Last heartbeat, Unix epoch seconds
    pub last_seen: i64,
}

/// A participant reconciled against the historical block index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinerStat {
    pub nickname: String,
    pub address: String,
    pub peer_id: String,
    pub parent_hashes: Vec<String>,
    pub power: BigDecimal,
    pub capacity: BigDecimal,
    /// Fraction of all ledger blocks produced by this address, in [0, 1]
    pub block_percentage: BigDecimal,
    pub block_height: u64,
    pub block_time: i64,
    pub is_in_consensus: bool,
    pub last_seen: i64,
    pub last_block_mined: Option<u64>,
}
