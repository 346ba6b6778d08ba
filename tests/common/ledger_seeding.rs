//! Raw-SQL seeding of the ledger schema

use serde_json::Value;
use storage_network_stats::database::Database;

pub fn empty_ledger() -> Database {
    Database::new(":memory:").unwrap()
}

pub fn insert_block(db: &Database, height: u64, miner: &str, ingested_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO blocks (height, miner, parent_hashes, ingested_at) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                height as i64,
                miner,
                serde_json::json!([format!("bafy-parent-{}", height)]).to_string(),
                ingested_at
            ],
        )?;
        Ok(())
    })
    .unwrap();
}

/// Insert a message into an existing block
pub fn insert_message(
    db: &Database,
    id: i64,
    height: u64,
    method: &str,
    params: Value,
    value: &str,
    from_address: &str,
) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO messages (id, height, method, params, value, from_address, to_address)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'f01')",
            rusqlite::params![id, height as i64, method, params.to_string(), value, from_address],
        )?;
        Ok(())
    })
    .unwrap();
}

pub fn insert_ask(db: &Database, id: i64, price: &str, message_id: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO asks (id, price, message_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, price, message_id],
        )?;
        Ok(())
    })
    .unwrap();
}

pub fn insert_miner_count(db: &Database, count: u64, calculated_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO miner_counts (count, calculated_at) VALUES (?1, ?2)",
            rusqlite::params![count as i64, calculated_at],
        )?;
        Ok(())
    })
    .unwrap();
}

pub fn insert_usage(db: &Database, committed: &str, pledged: &str, calculated_at: i64) {
    db.with_connection(|conn| {
        conn.execute(
            "INSERT INTO network_usage_stats (total_committed_gb, total_pledged_gb, calculated_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![committed, pledged, calculated_at],
        )?;
        Ok(())
    })
    .unwrap();
}

/// A block carrying one message, heights and ids derived from `id`
pub fn insert_block_with_message(
    db: &Database,
    id: i64,
    method: &str,
    params: Value,
    value: &str,
    from_address: &str,
    ingested_at: i64,
) {
    let height = id as u64;
    insert_block(db, height, "", ingested_at);
    insert_message(db, id, height, method, params, value, from_address);
}
