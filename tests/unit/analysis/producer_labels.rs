//! Producer ranking, labelling and cohort membership

use crate::common::dec;
use serde_json::json;
use storage_network_stats::analysis::{
    CapacityIndex, CostCapacitySegmenter, DistributionEvolutionComputer,
};
use storage_network_stats::types::{
    AskQuote, CohortSide, LedgerMessage, MinerBlockCount, METHOD_COMMIT_SECTOR,
    METHOD_CREATE_MINER,
};

fn count(address: &str, blocks: u64) -> MinerBlockCount {
    MinerBlockCount {
        address: address.to_string(),
        blocks_mined: blocks,
        last_block_height: blocks,
    }
}

fn message(id: i64, method: &str, from: &str, param: serde_json::Value) -> LedgerMessage {
    LedgerMessage {
        id,
        height: id as u64,
        method: method.to_string(),
        params: vec![param],
        value: dec("0"),
        from_address: from.to_string(),
        to_address: "f01".to_string(),
        ingested_at: 0,
    }
}

#[test]
fn test_labels_are_unique() {
    let producers = vec![
        count("fcq0001", 9),
        count("fcq0002", 8),
        count("fcq0003", 7),
        count("fcq9002", 6),
    ];
    let nicknames = vec![
        Some("pool".to_string()),
        Some("pool".to_string()),
        Some(String::new()),
        Some("pool".to_string()),
    ];
    let labelled = DistributionEvolutionComputer::assign_labels(&producers, &nicknames);
    let labels: Vec<&str> = labelled.iter().map(|p| p.label.as_str()).collect();

    // An empty nickname counts as none
    assert_eq!(labels, vec!["pool", "pool (0002)", "fcq0003", "pool (9002)"]);
    let unique: std::collections::HashSet<&str> = labels.iter().copied().collect();
    assert_eq!(unique.len(), labels.len());
}

#[test]
fn test_suffix_collision_falls_back_to_address() {
    let producers = vec![count("aaa0002", 3), count("bbb0002", 2), count("ccc0002", 1)];
    let nicknames = vec![Some("pool".to_string()); 3];
    let labels: Vec<String> = DistributionEvolutionComputer::assign_labels(&producers, &nicknames)
        .into_iter()
        .map(|p| p.label)
        .collect();
    assert_eq!(labels, vec!["pool", "pool (0002)", "ccc0002"]);
}

#[test]
fn test_top_producers_respects_limit() {
    let counts: Vec<MinerBlockCount> = (0..20).map(|i| count(&format!("fcq{:02}", i), i)).collect();
    let top = DistributionEvolutionComputer::top_producers(&counts, 10);
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].address, "fcq19");
    assert!(top.windows(2).all(|w| w[0].blocks_mined >= w[1].blocks_mined));
}

#[test]
fn test_cohorts_partition_participants() {
    let creates = vec![
        message(1, METHOD_CREATE_MINER, "small", json!(4)),
        message(2, METHOD_CREATE_MINER, "edge", json!(400)),
        message(3, METHOD_CREATE_MINER, "large", json!(4000)),
    ];
    let commits = vec![message(4, METHOD_COMMIT_SECTOR, "edge", json!("s1"))];
    let index = CapacityIndex::build(&creates, &commits, &dec("0.25"));
    let asks: Vec<AskQuote> = Vec::new();
    let threshold = dec("100");

    let below = CostCapacitySegmenter::segment(CohortSide::Below, &threshold, &index, &asks, 18);
    let above = CostCapacitySegmenter::segment(CohortSide::AtOrAbove, &threshold, &index, &asks, 18);

    // 100 GB sits exactly on the threshold and belongs to the upper cohort
    assert_eq!(below.count, 1);
    assert_eq!(above.count, 2);
    assert_eq!(below.count + above.count, index.pledged().len() as u64);
    assert_eq!(above.average_capacity_gb, dec("550"));
    assert_eq!(above.utilization, dec("0.0025"));
    assert_eq!(below.average_storage_price, dec("0"));
}
