//! Per-participant pledged and committed capacity
//!
//! Pledged capacity comes from `createMiner` messages (`params[0]` sectors);
//! committed capacity from `commitSector` messages, counting each distinct
//! sector id (`params[0]`) once per participant. Both are reported in GB.

use crate::types::{LedgerMessage, METHOD_COMMIT_SECTOR, METHOD_CREATE_MINER};
use crate::utils::math::sum;
use bigdecimal::BigDecimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Capacity of every participant with at least one capacity-establishing event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityIndex {
    pledged: BTreeMap<String, BigDecimal>,
    committed: BTreeMap<String, BigDecimal>,
}

impl CapacityIndex {
    /// Build from `createMiner` and `commitSector` messages. Messages with a
    /// missing or unparseable `params[0]` are skipped.
    pub fn build(
        create_miner: &[LedgerMessage],
        commit_sector: &[LedgerMessage],
        sector_gb: &BigDecimal,
    ) -> Self {
        let mut pledged_sectors: BTreeMap<String, BigDecimal> = BTreeMap::new();
        for message in create_miner.iter().filter(|m| m.method == METHOD_CREATE_MINER) {
            match message.param_decimal(0) {
                Some(sectors) => {
                    *pledged_sectors.entry(message.from_address.clone()).or_default() += sectors;
                }
                None => warn!(
                    message_id = message.id,
                    address = %message.from_address,
                    "Skipping createMiner message without a sector count"
                ),
            }
        }

        let mut sector_ids: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for message in commit_sector.iter().filter(|m| m.method == METHOD_COMMIT_SECTOR) {
            match message.param_key(0) {
                Some(sector_id) => {
                    sector_ids
                        .entry(message.from_address.clone())
                        .or_default()
                        .insert(sector_id);
                }
                None => warn!(
                    message_id = message.id,
                    address = %message.from_address,
                    "Skipping commitSector message without a sector id"
                ),
            }
        }

        let pledged = pledged_sectors
            .into_iter()
            .map(|(address, sectors)| (address, sectors * sector_gb))
            .collect();
        let committed = sector_ids
            .into_iter()
            .map(|(address, ids)| (address, BigDecimal::from(ids.len() as u64) * sector_gb))
            .collect();

        Self { pledged, committed }
    }

    /// Pledged GB per participant
    pub fn pledged(&self) -> &BTreeMap<String, BigDecimal> {
        &self.pledged
    }

    /// Committed GB per participant (participants that committed anything)
    pub fn committed(&self) -> &BTreeMap<String, BigDecimal> {
        &self.committed
    }

    pub fn total_pledged_gb(&self) -> BigDecimal {
        sum(self.pledged.values())
    }

    pub fn total_committed_gb(&self) -> BigDecimal {
        sum(self.committed.values())
    }
}
