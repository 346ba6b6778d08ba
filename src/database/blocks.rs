//! `BlockIndex` implementation over the `blocks` table

use super::ledger::{load_production_window, to_u64};
use super::query_helper::QueryHelper;
use super::traits::{BlockIndex, HeightSelection};
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::types::{BlockRecord, ChainSnapshot};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

type RawBlock = (i64, String, String, i64);

fn to_block((height, miner, parent_hashes, ingested_at): RawBlock) -> AppResult<BlockRecord> {
    Ok(BlockRecord {
        height: to_u64(height, "blocks.height")?,
        miner,
        parent_hashes: serde_json::from_str(&parent_hashes)?,
        ingested_at,
    })
}

fn load_top_block(conn: &Connection) -> AppResult<Option<BlockRecord>> {
    let raw: Option<RawBlock> = conn
        .query_row(
            "SELECT height, miner, parent_hashes, ingested_at
             FROM blocks
             ORDER BY height DESC
             LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .optional()?;
    raw.map(to_block).transpose()
}

/// Heights travel as one JSON array parameter, so the set size is not bound
/// by SQLite's host-parameter limit
fn load_blocks_at_heights(conn: &Connection, heights: &BTreeSet<u64>) -> AppResult<Vec<BlockRecord>> {
    if heights.is_empty() {
        return Ok(Vec::new());
    }

    let heights = heights
        .iter()
        .map(|h| i64::try_from(*h))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InvalidData(format!("height out of range: {}", e)))?;
    let heights_json = serde_json::to_string(&heights)?;

    let rows: Vec<RawBlock> = conn.query_collect(
        "SELECT height, miner, parent_hashes, ingested_at
         FROM blocks
         WHERE height IN (SELECT value FROM json_each(?1))
         ORDER BY height",
        params![heights_json],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
    )?;
    rows.into_iter().map(to_block).collect::<AppResult<Vec<_>>>()
}

#[async_trait]
impl BlockIndex for Database {
    async fn top_block(&self) -> AppResult<Option<BlockRecord>> {
        self.run_blocking(|conn| load_top_block(conn)).await
    }

    async fn blocks_at_heights(&self, heights: &BTreeSet<u64>) -> AppResult<Vec<BlockRecord>> {
        if heights.is_empty() {
            return Ok(Vec::new());
        }
        let heights = heights.clone();
        self.run_blocking(move |conn| load_blocks_at_heights(conn, &heights))
            .await
    }

    async fn chain_snapshot(&self, select: HeightSelection) -> AppResult<Option<ChainSnapshot>> {
        self.run_transaction(move |tx| {
            let Some(top) = load_top_block(tx)? else {
                return Ok(None);
            };
            let heights = select(top.height);
            let blocks = load_blocks_at_heights(tx, &heights)?;
            let production = load_production_window(tx, None)?;
            Ok(Some(ChainSnapshot {
                top,
                blocks,
                production,
            }))
        })
        .await
    }
}
