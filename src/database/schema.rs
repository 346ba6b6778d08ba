//! Ledger schema
//!
//! ## Tables
//!
//! - `blocks`: one row per canonical block, `parent_hashes` as a JSON array
//! - `messages`: chain messages, `params` as a JSON array, `value` in base units
//! - `asks`: storage ask quotes, each attached to the message that carried it
//! - `network_usage_stats`: materialised committed / pledged totals (written by the engine)
//! - `miner_counts`: externally materialised miner counts
//!
//! Decimal columns are TEXT so token amounts survive beyond 64-bit range.

use crate::errors::AppResult;
use rusqlite::Connection;
use tracing::debug;

/// Initialise the complete ledger schema
pub fn setup_schema(connection: &Connection) -> AppResult<()> {
    connection.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS blocks (
            height INTEGER PRIMARY KEY,
            miner TEXT NOT NULL DEFAULT '',
            parent_hashes TEXT NOT NULL DEFAULT '[]',
            ingested_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_blocks_ingested_at ON blocks(ingested_at);
        CREATE INDEX IF NOT EXISTS idx_blocks_miner ON blocks(miner);

        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY,
            height INTEGER NOT NULL REFERENCES blocks(height),
            method TEXT NOT NULL,
            params TEXT NOT NULL DEFAULT '[]',
            value TEXT NOT NULL DEFAULT '0',
            from_address TEXT NOT NULL,
            to_address TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_method ON messages(method);
        CREATE INDEX IF NOT EXISTS idx_messages_from ON messages(from_address);

        CREATE TABLE IF NOT EXISTS asks (
            id INTEGER PRIMARY KEY,
            price TEXT NOT NULL,
            message_id INTEGER NOT NULL REFERENCES messages(id)
        );

        CREATE TABLE IF NOT EXISTS network_usage_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            total_committed_gb TEXT NOT NULL,
            total_pledged_gb TEXT NOT NULL,
            calculated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_network_usage_calculated_at
            ON network_usage_stats(calculated_at);

        CREATE TABLE IF NOT EXISTS miner_counts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            count INTEGER NOT NULL,
            calculated_at INTEGER NOT NULL
        );
        "#,
    )?;

    debug!("Ledger schema initialised");
    Ok(())
}
