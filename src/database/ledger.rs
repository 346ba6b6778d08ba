//! `LedgerStore` implementation over the SQLite schema
//!
//! Every loader takes a plain `&Connection`, so a metric that needs several
//! reads runs them all inside one transaction and sees a single snapshot.

use super::query_helper::QueryHelper;
use super::traits::{LedgerStore, UsageCalculation};
use super::Database;
use crate::errors::{AppError, AppResult};
use crate::types::{
    AskQuote, CapacityMessages, CohortInputs, DailyBlockCount, DailyProduction, LedgerMessage,
    MinerBlockCount, MinerCountSnapshot, NetworkUsageSnapshot, ProductionWindow,
    METHOD_COMMIT_SECTOR, METHOD_CREATE_MINER,
};
use crate::utils::math::parse_decimal;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::debug;

/// Convert a stored INTEGER to an unsigned count/height
pub(crate) fn to_u64(value: i64, field: &str) -> AppResult<u64> {
    u64::try_from(value)
        .map_err(|_| AppError::InvalidData(format!("{} must be non-negative, got {}", field, value)))
}

fn load_messages(conn: &Connection, method: &str) -> AppResult<Vec<LedgerMessage>> {
    let rows = conn.query_collect(
        "SELECT m.id, m.height, m.method, m.params, m.value,
                m.from_address, m.to_address, b.ingested_at
         FROM messages m
         JOIN blocks b ON b.height = m.height
         WHERE m.method = ?1
         ORDER BY m.id",
        params![method],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, i64>(7)?,
            ))
        },
    )?;

    let messages = rows
        .into_iter()
        .map(
            |(id, height, method, params_json, value, from_address, to_address, ingested_at)|
             -> AppResult<LedgerMessage> {
                Ok(LedgerMessage {
                    id,
                    height: to_u64(height, "messages.height")?,
                    method,
                    params: serde_json::from_str(&params_json)?,
                    value: parse_decimal(&value, "messages.value")?,
                    from_address,
                    to_address,
                    ingested_at,
                })
            },
        )
        .collect::<AppResult<Vec<_>>>()?;

    debug!("Loaded {} '{}' messages", messages.len(), method);
    Ok(messages)
}

fn load_capacity_messages(conn: &Connection) -> AppResult<CapacityMessages> {
    Ok(CapacityMessages {
        create_miner: load_messages(conn, METHOD_CREATE_MINER)?,
        commit_sector: load_messages(conn, METHOD_COMMIT_SECTOR)?,
    })
}

fn load_asks(conn: &Connection, since: Option<i64>) -> AppResult<Vec<AskQuote>> {
    let rows = conn.query_collect(
        "SELECT a.message_id, a.price, m.from_address, b.ingested_at
         FROM asks a
         JOIN messages m ON a.message_id = m.id
         JOIN blocks b ON b.height = m.height
         WHERE ?1 IS NULL OR b.ingested_at > ?1
         ORDER BY b.ingested_at, a.id",
        params![since],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        },
    )?;

    rows.into_iter()
        .map(|(message_id, price, from_address, ingested_at)| -> AppResult<AskQuote> {
            Ok(AskQuote {
                message_id,
                price: parse_decimal(&price, "asks.price")?,
                from_address,
                ingested_at,
            })
        })
        .collect::<AppResult<Vec<_>>>()
}

fn load_block_counts(
    conn: &Connection,
    since: Option<i64>,
) -> AppResult<Vec<MinerBlockCount>> {
    let rows = conn.query_collect(
        "SELECT miner, COUNT(*), MAX(height)
         FROM blocks
         WHERE miner != '' AND (?1 IS NULL OR ingested_at > ?1)
         GROUP BY miner
         ORDER BY miner",
        params![since],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;

    rows.into_iter()
        .map(|(address, blocks_mined, last_block_height)| -> AppResult<MinerBlockCount> {
            Ok(MinerBlockCount {
                address,
                blocks_mined: to_u64(blocks_mined, "block count")?,
                last_block_height: to_u64(last_block_height, "blocks.height")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()
}

pub(super) fn load_production_window(
    conn: &Connection,
    since: Option<i64>,
) -> AppResult<ProductionWindow> {
    let counts = load_block_counts(conn, since)?;
    let total: i64 = conn.safe_aggregate(
        "SELECT COUNT(*) FROM blocks WHERE ?1 IS NULL OR ingested_at > ?1",
        params![since],
        0,
    )?;
    Ok(ProductionWindow {
        counts,
        total_blocks: to_u64(total, "block count")?,
    })
}

fn load_daily_counts(conn: &Connection, since: i64) -> AppResult<Vec<DailyBlockCount>> {
    let rows = conn.query_collect(
        "SELECT (ingested_at - (ingested_at % 86400)) AS day, miner, COUNT(*)
         FROM blocks
         WHERE ingested_at > ?1
         GROUP BY day, miner
         ORDER BY day, miner",
        params![since],
        |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;

    rows.into_iter()
        .map(|(day, address, count)| -> AppResult<DailyBlockCount> {
            Ok(DailyBlockCount {
                day,
                address,
                count: to_u64(count, "daily block count")?,
            })
        })
        .collect::<AppResult<Vec<_>>>()
}

fn load_usage_snapshots(conn: &Connection, since: i64) -> AppResult<Vec<NetworkUsageSnapshot>> {
    let rows = conn.query_collect(
        "SELECT total_committed_gb, total_pledged_gb, calculated_at
         FROM network_usage_stats
         WHERE calculated_at >= ?1
         ORDER BY calculated_at, id",
        params![since],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        },
    )?;

    rows.into_iter()
        .map(|(committed, pledged, calculated_at)| -> AppResult<NetworkUsageSnapshot> {
            Ok(NetworkUsageSnapshot {
                total_committed_gb: parse_decimal(&committed, "network_usage_stats.total_committed_gb")?,
                total_pledged_gb: parse_decimal(&pledged, "network_usage_stats.total_pledged_gb")?,
                calculated_at,
            })
        })
        .collect::<AppResult<Vec<_>>>()
}

fn load_miner_counts(conn: &Connection, since: i64) -> AppResult<Vec<MinerCountSnapshot>> {
    let rows = conn.query_collect(
        "SELECT count, calculated_at
         FROM miner_counts
         WHERE calculated_at >= ?1
         ORDER BY calculated_at, id",
        params![since],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    rows.into_iter()
        .map(|(count, calculated_at)| -> AppResult<MinerCountSnapshot> {
            Ok(MinerCountSnapshot {
                count: to_u64(count, "miner_counts.count")?,
                calculated_at,
            })
        })
        .collect::<AppResult<Vec<_>>>()
}

fn insert_usage_snapshot(conn: &Connection, snapshot: &NetworkUsageSnapshot) -> AppResult<()> {
    conn.execute(
        "INSERT INTO network_usage_stats (total_committed_gb, total_pledged_gb, calculated_at)
         VALUES (?1, ?2, ?3)",
        params![
            snapshot.total_committed_gb.to_string(),
            snapshot.total_pledged_gb.to_string(),
            snapshot.calculated_at
        ],
    )?;
    debug!(
        "Inserted network usage snapshot at {}: committed={} pledged={}",
        snapshot.calculated_at, snapshot.total_committed_gb, snapshot.total_pledged_gb
    );
    Ok(())
}

#[async_trait]
impl LedgerStore for Database {
    async fn messages_by_method(&self, method: &str) -> AppResult<Vec<LedgerMessage>> {
        let method = method.to_string();
        self.run_blocking(move |conn| load_messages(conn, &method))
            .await
    }

    async fn capacity_messages(&self) -> AppResult<CapacityMessages> {
        self.run_transaction(|tx| load_capacity_messages(tx)).await
    }

    async fn cohort_inputs(&self) -> AppResult<CohortInputs> {
        self.run_transaction(|tx| {
            Ok(CohortInputs {
                capacity: load_capacity_messages(tx)?,
                asks: load_asks(tx, None)?,
            })
        })
        .await
    }

    async fn ask_quotes(&self, since: Option<i64>) -> AppResult<Vec<AskQuote>> {
        self.run_blocking(move |conn| load_asks(conn, since)).await
    }

    async fn production_window(&self, since: Option<i64>) -> AppResult<ProductionWindow> {
        self.run_transaction(move |tx| load_production_window(tx, since))
            .await
    }

    async fn daily_production(&self, since: i64) -> AppResult<DailyProduction> {
        self.run_transaction(move |tx| {
            Ok(DailyProduction {
                counts: load_block_counts(tx, Some(since))?,
                daily: load_daily_counts(tx, since)?,
            })
        })
        .await
    }

    async fn network_usage_snapshots(&self, since: i64) -> AppResult<Vec<NetworkUsageSnapshot>> {
        self.run_blocking(move |conn| load_usage_snapshots(conn, since))
            .await
    }

    async fn miner_count_snapshots(&self, since: i64) -> AppResult<Vec<MinerCountSnapshot>> {
        self.run_blocking(move |conn| load_miner_counts(conn, since))
            .await
    }

    async fn append_network_usage(
        &self,
        calculate: UsageCalculation,
    ) -> AppResult<NetworkUsageSnapshot> {
        self.run_transaction(move |tx| {
            let snapshot = calculate(load_capacity_messages(tx)?)?;
            insert_usage_snapshot(tx, &snapshot)?;
            Ok(snapshot)
        })
        .await
    }
}
