//! SQLite `LedgerStore` / `BlockIndex` query semantics

use anyhow::Result;
use crate::common::ledger_seeding::*;
use crate::common::{dec, DAY, TODAY};
use serde_json::json;
use std::collections::BTreeSet;
use storage_network_stats::database::{BlockIndex, LedgerStore};
use storage_network_stats::errors::AppResult;
use storage_network_stats::types::{
    CapacityMessages, NetworkUsageSnapshot, METHOD_COMMIT_SECTOR, METHOD_CREATE_MINER,
};

#[tokio::test]
async fn test_messages_carry_block_time_and_exact_values() -> Result<()> {
    let db = empty_ledger();
    insert_block(&db, 7, "fcqa", TODAY + 60);
    insert_message(
        &db,
        1,
        7,
        METHOD_CREATE_MINER,
        json!([16, "extra"]),
        "123456789012345678901234567890",
        "fcqa",
    );
    insert_message(&db, 2, 7, "commitSector", json!([1]), "0", "fcqa");

    let messages = db.messages_by_method(METHOD_CREATE_MINER).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].ingested_at, TODAY + 60);
    assert_eq!(messages[0].value, dec("123456789012345678901234567890"));
    assert_eq!(messages[0].param_decimal(0), Some(dec("16")));
    Ok(())
}

#[tokio::test]
async fn test_block_counts_exclude_unattributed_and_respect_since() -> Result<()> {
    let db = empty_ledger();
    insert_block(&db, 1, "fcqa", TODAY - 2 * DAY);
    insert_block(&db, 2, "fcqa", TODAY);
    insert_block(&db, 3, "", TODAY + 1);
    insert_block(&db, 4, "fcqb", TODAY + 2);

    let all = db.production_window(None).await?.counts;
    assert_eq!(all.len(), 2);
    let alpha = all.iter().find(|c| c.address == "fcqa").unwrap();
    assert_eq!(alpha.blocks_mined, 2);
    assert_eq!(alpha.last_block_height, 2);

    // `since` is exclusive
    let recent = db.production_window(Some(TODAY)).await?;
    let addresses: Vec<&str> = recent.counts.iter().map(|c| c.address.as_str()).collect();
    assert_eq!(addresses, vec!["fcqb"]);

    assert_eq!(db.production_window(None).await?.total_blocks, 4);
    assert_eq!(recent.total_blocks, 2);
    Ok(())
}

#[tokio::test]
async fn test_daily_counts_keep_unattributed_blocks() -> Result<()> {
    let db = empty_ledger();
    insert_block(&db, 1, "fcqa", TODAY + 10);
    insert_block(&db, 2, "fcqa", TODAY + 20);
    insert_block(&db, 3, "", TODAY + 30);
    insert_block(&db, 4, "fcqa", TODAY - DAY + 5);

    let production = db.daily_production(TODAY - 2 * DAY).await?;
    let rows: Vec<(i64, &str, u64)> = production
        .daily
        .iter()
        .map(|d| (d.day, d.address.as_str(), d.count))
        .collect();
    assert_eq!(
        rows,
        vec![(TODAY - DAY, "fcqa", 1), (TODAY, "", 1), (TODAY, "fcqa", 2)]
    );
    // Totals come from the same read and skip the unattributed block
    assert_eq!(production.counts.len(), 1);
    assert_eq!(production.counts[0].blocks_mined, 3);
    Ok(())
}

#[tokio::test]
async fn test_ask_quotes_join_sender_and_time() -> Result<()> {
    let db = empty_ledger();
    insert_block_with_message(&db, 1, "addAsk", json!([]), "0", "fcqa", TODAY - DAY);
    insert_block_with_message(&db, 2, "addAsk", json!([]), "0", "fcqb", TODAY);
    insert_ask(&db, 1, "5", 1);
    insert_ask(&db, 2, "7", 2);

    assert_eq!(db.ask_quotes(None).await?.len(), 2);
    let recent = db.ask_quotes(Some(TODAY - 1)).await?;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].from_address, "fcqb");
    assert_eq!(recent[0].price, dec("7"));
    assert_eq!(recent[0].ingested_at, TODAY);
    Ok(())
}

#[tokio::test]
async fn test_network_usage_round_trip() -> Result<()> {
    let db = empty_ledger();
    let snapshot = NetworkUsageSnapshot {
        total_committed_gb: dec("12.75"),
        total_pledged_gb: dec("100000000000000000000.5"),
        calculated_at: TODAY,
    };
    let stored = snapshot.clone();
    let appended = db
        .append_network_usage(Box::new(move |_: CapacityMessages| -> AppResult<_> { Ok(stored) }))
        .await?;
    assert_eq!(appended, snapshot);
    insert_usage(&db, "1", "2", TODAY - DAY);

    let since_today = db.network_usage_snapshots(TODAY).await?;
    assert_eq!(since_today, vec![snapshot]);
    assert_eq!(db.network_usage_snapshots(TODAY - DAY).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_block_index_lookup() -> Result<()> {
    let db = empty_ledger();
    assert!(db.top_block().await?.is_none());

    insert_block(&db, 3, "fcqa", TODAY);
    insert_block(&db, 5, "fcqb", TODAY + 1);

    let top = db.top_block().await?.unwrap();
    assert_eq!(top.height, 5);
    assert_eq!(top.parent_hashes, vec!["bafy-parent-5".to_string()]);

    let heights: BTreeSet<u64> = [3, 4, 5].into_iter().collect();
    let found: Vec<u64> = db
        .blocks_at_heights(&heights)
        .await?
        .into_iter()
        .map(|b| b.height)
        .collect();
    assert_eq!(found, vec![3, 5]);
    Ok(())
}

#[tokio::test]
async fn test_capacity_reads_share_one_snapshot() -> Result<()> {
    let db = empty_ledger();
    insert_block(&db, 1, "fcqa", TODAY);
    insert_message(&db, 1, 1, METHOD_CREATE_MINER, json!([4]), "10", "fcqa");
    insert_message(&db, 2, 1, METHOD_COMMIT_SECTOR, json!([1]), "0", "fcqa");
    insert_message(&db, 3, 1, METHOD_COMMIT_SECTOR, json!([2]), "0", "fcqa");
    insert_ask(&db, 1, "5", 1);

    let messages = db.capacity_messages().await?;
    assert_eq!(messages.create_miner.len(), 1);
    assert_eq!(messages.commit_sector.len(), 2);

    let inputs = db.cohort_inputs().await?;
    assert_eq!(inputs.capacity, messages);
    assert_eq!(inputs.asks.len(), 1);

    // The calculation sees exactly the rows the append commits alongside
    let appended = db
        .append_network_usage(Box::new(|messages: CapacityMessages| -> AppResult<_> {
            Ok(NetworkUsageSnapshot {
                total_committed_gb: dec(&messages.commit_sector.len().to_string()),
                total_pledged_gb: dec(&messages.create_miner.len().to_string()),
                calculated_at: TODAY,
            })
        }))
        .await?;
    assert_eq!(appended.total_committed_gb, dec("2"));
    assert_eq!(db.network_usage_snapshots(TODAY).await?, vec![appended]);
    Ok(())
}

#[tokio::test]
async fn test_chain_snapshot_selects_from_top_height() -> Result<()> {
    let db = empty_ledger();
    assert!(db.chain_snapshot(Box::new(|_: u64| BTreeSet::new())).await?.is_none());

    insert_block(&db, 3, "fcqa", TODAY);
    insert_block(&db, 5, "", TODAY + 1);

    let snapshot = db
        .chain_snapshot(Box::new(|top: u64| [3, top].into_iter().collect::<BTreeSet<u64>>()))
        .await?
        .unwrap();
    assert_eq!(snapshot.top.height, 5);
    assert_eq!(snapshot.blocks.len(), 2);
    assert_eq!(snapshot.production.total_blocks, 2);
    assert_eq!(snapshot.production.counts.len(), 1);
    Ok(())
}
