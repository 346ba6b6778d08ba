//! Reconciliation of live registry entries with the historical block index
//!
//! ## Rules
//!
//! - A participant's reported height is clamped to the top height before the
//!   block lookup; nodes ahead of the canonical chain resolve to the top block.
//! - `is_in_consensus` compares the *unclamped* height with the top height.
//! - A participant whose clamped height has no block is skipped with a warning.
//! - Block share is blocks mined by the address over all ledger blocks, zero
//!   for an address that never mined.
//!
//! Output keeps the registry's listing order.

use crate::types::{BlockRecord, MinerBlockCount, MinerStat, Participant};
use crate::utils::math::share;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

pub struct MinerStatReconciler;

impl MinerStatReconciler {
    /// Block heights needed to reconcile `participants`
    pub fn lookup_heights(participants: &[Participant], top_height: u64) -> BTreeSet<u64> {
        participants
            .iter()
            .map(|p| p.height.min(top_height))
            .collect()
    }

    pub fn reconcile(
        participants: &[Participant],
        top_height: u64,
        blocks: &[BlockRecord],
        block_counts: &[MinerBlockCount],
        total_blocks: u64,
    ) -> Vec<MinerStat> {
        let blocks_by_height: HashMap<u64, &BlockRecord> =
            blocks.iter().map(|b| (b.height, b)).collect();
        let counts_by_address: HashMap<&str, &MinerBlockCount> = block_counts
            .iter()
            .map(|c| (c.address.as_str(), c))
            .collect();

        participants
            .iter()
            .filter_map(|participant| {
                let clamped = participant.height.min(top_height);
                let Some(block) = blocks_by_height.get(&clamped) else {
                    warn!(
                        peer_id = %participant.peer_id,
                        nickname = %participant.nickname,
                        address = %participant.address,
                        top_height,
                        height = participant.height,
                        "No block found at participant height, skipping"
                    );
                    return None;
                };

                let activity = counts_by_address.get(participant.address.as_str());
                Some(MinerStat {
                    nickname: participant.nickname.clone(),
                    address: participant.address.clone(),
                    peer_id: participant.peer_id.clone(),
                    parent_hashes: block.parent_hashes.clone(),
                    power: participant.power.clone(),
                    capacity: participant.capacity.clone(),
                    block_percentage: share(
                        activity.map_or(0, |a| a.blocks_mined),
                        total_blocks,
                    ),
                    block_height: block.height,
                    block_time: block.ingested_at,
                    is_in_consensus: participant.height >= top_height,
                    last_seen: participant.last_seen,
                    last_block_mined: activity.map(|a| a.last_block_height),
                })
            })
            .collect()
    }
}
