//! Historical series: bucketing, fill policies and materialisation

use crate::common::ledger_seeding::*;
use crate::common::{dec, facade, DAY, NOW, TODAY};
use bigdecimal::BigDecimal;
use serde_json::json;
use storage_network_stats::stats::HistoricalMetric;
use storage_network_stats::types::{ChartDuration, TimeseriesPoint, METHOD_CREATE_MINER};

fn amount_at(points: &[TimeseriesPoint], date: i64) -> BigDecimal {
    points
        .iter()
        .find(|p| p.date == date)
        .map(|p| p.amount.clone())
        .unwrap_or_else(|| panic!("no point at {}", date))
}

fn tokens(n: u64) -> String {
    format!("{}000000000000000000", n)
}

#[tokio::test]
async fn test_miner_counts_take_bucket_max_and_zero_fill() {
    let db = empty_ledger();
    insert_miner_count(&db, 5, TODAY - 2 * DAY + 100);
    insert_miner_count(&db, 7, TODAY - 2 * DAY + 200);
    insert_miner_count(&db, 6, TODAY + 10);
    insert_miner_count(&db, 99, TODAY - 90 * DAY);

    let points = facade(&db, vec![])
        .historical(HistoricalMetric::MinerCounts, ChartDuration::Month)
        .await
        .unwrap();

    assert_eq!(points.len(), 30);
    assert_eq!(points.last().unwrap().date, TODAY);
    assert_eq!(amount_at(&points, TODAY - 2 * DAY), BigDecimal::from(7));
    assert_eq!(amount_at(&points, TODAY - DAY), BigDecimal::from(0));
    assert_eq!(amount_at(&points, TODAY), BigDecimal::from(6));
    assert!(points.iter().all(|p| p.amount <= BigDecimal::from(7)));
}

#[tokio::test]
async fn test_series_dates_are_strictly_increasing_for_every_duration() {
    let db = empty_ledger();
    let stats = facade(&db, vec![]);

    for duration in ChartDuration::ALL {
        for metric in HistoricalMetric::ALL {
            let points = stats.historical(metric, duration).await.unwrap();
            assert!(!points.is_empty(), "{} {}", metric, duration);
            assert!(points.windows(2).all(|w| w[0].date < w[1].date));
            assert!(points.last().unwrap().date <= NOW);
        }
    }
}

#[tokio::test]
async fn test_storage_amount_forward_fills_running_max() {
    let db = empty_ledger();
    insert_usage(&db, "1", "10", TODAY - 3 * DAY + 5);
    insert_usage(&db, "1", "8", TODAY - DAY + 5);

    let stats = facade(&db, vec![]);
    let points = stats.historical_storage_amount(ChartDuration::Month).await.unwrap();

    assert_eq!(amount_at(&points, TODAY - 4 * DAY), BigDecimal::from(0));
    assert_eq!(amount_at(&points, TODAY - 3 * DAY), BigDecimal::from(10));
    assert_eq!(amount_at(&points, TODAY - 2 * DAY), BigDecimal::from(10));
    assert_eq!(amount_at(&points, TODAY - DAY), BigDecimal::from(8));
    assert_eq!(amount_at(&points, TODAY), BigDecimal::from(10));

    let amount = stats.get_stats().await.unwrap().storage_amount;
    assert_eq!(amount.total, BigDecimal::from(10));
    assert_eq!(amount.trend, dec("0.25"));
}

#[tokio::test]
async fn test_utilization_is_committed_over_pledged() {
    let db = empty_ledger();
    insert_usage(&db, "2.5", "10", TODAY + 5);
    insert_usage(&db, "0", "0", TODAY - DAY + 5);

    let points = facade(&db, vec![])
        .historical_utilization(ChartDuration::Month)
        .await
        .unwrap();

    assert_eq!(amount_at(&points, TODAY), dec("0.25"));
    assert_eq!(amount_at(&points, TODAY - DAY), BigDecimal::from(0));
    assert_eq!(amount_at(&points, TODAY - 2 * DAY), BigDecimal::from(0));
}

#[tokio::test]
async fn test_collateral_accumulates_within_window() {
    let db = empty_ledger();
    insert_block_with_message(&db, 1, METHOD_CREATE_MINER, json!([4]), &tokens(2), "fcqold", TODAY - 60 * DAY);
    insert_block_with_message(&db, 2, METHOD_CREATE_MINER, json!([8]), &tokens(2), "fcqa", TODAY - DAY + 100);
    insert_block_with_message(&db, 3, METHOD_CREATE_MINER, json!([4]), &tokens(3), "fcqb", TODAY + 100);

    let points = facade(&db, vec![])
        .historical_collateral(ChartDuration::Month)
        .await
        .unwrap();

    assert_eq!(points.first().unwrap().amount, BigDecimal::from(0));
    assert_eq!(amount_at(&points, TODAY - DAY), BigDecimal::from(2));
    assert_eq!(amount_at(&points, TODAY), BigDecimal::from(5));
    assert!(points.windows(2).all(|w| w[0].amount <= w[1].amount));
}

#[tokio::test]
async fn test_collateral_per_gb_ratio_and_all_time_average() {
    let db = empty_ledger();
    // 0.25 GB sectors: 4 sectors = 1 GB
    insert_block_with_message(&db, 1, METHOD_CREATE_MINER, json!([4]), &tokens(2), "fcqold", TODAY - 60 * DAY);
    insert_block_with_message(&db, 2, METHOD_CREATE_MINER, json!([8]), &tokens(2), "fcqa", TODAY - DAY + 100);
    insert_block_with_message(&db, 3, METHOD_CREATE_MINER, json!([4]), &tokens(3), "fcqb", TODAY + 100);
    insert_block_with_message(&db, 4, METHOD_CREATE_MINER, json!([]), &tokens(50), "fcqbad", TODAY + 200);

    let stats = facade(&db, vec![]);
    let per_gb = stats.get_stats().await.unwrap().historical_collateral_per_gb;

    assert_eq!(amount_at(&per_gb.data, TODAY - DAY), BigDecimal::from(1));
    assert_eq!(amount_at(&per_gb.data, TODAY), BigDecimal::from(3));
    assert_eq!(amount_at(&per_gb.data, TODAY - 2 * DAY), BigDecimal::from(0));
    assert_eq!(per_gb.average, BigDecimal::from(2));
}

#[tokio::test]
async fn test_storage_price_means_and_cost_average() {
    let db = empty_ledger();
    let asks = [
        (1, 4, TODAY - DAY + 50),
        (2, 2, TODAY + 50),
        (3, 6, TODAY + 60),
        (4, 100, TODAY - 40 * DAY),
    ];
    for (id, price, at) in asks {
        insert_block_with_message(&db, id, "addAsk", json!([]), "0", "fcqa", at);
        insert_ask(&db, id, &tokens(price), id);
    }

    let stats = facade(&db, vec![]);
    let points = stats.historical_storage_price(ChartDuration::Month).await.unwrap();
    assert_eq!(amount_at(&points, TODAY - DAY), BigDecimal::from(4));
    assert_eq!(amount_at(&points, TODAY), BigDecimal::from(4));
    assert_eq!(amount_at(&points, TODAY - 2 * DAY), BigDecimal::from(0));

    let cost = stats.get_stats().await.unwrap().storage_cost;
    assert_eq!(cost.average, BigDecimal::from(4));
    assert_eq!(cost.trend, BigDecimal::from(0));
}

#[tokio::test]
async fn test_materialize_then_storage_amount() {
    let db = empty_ledger();
    insert_block_with_message(&db, 1, METHOD_CREATE_MINER, json!([40]), &tokens(1), "fcqa", TODAY - 5 * DAY);
    insert_block_with_message(&db, 2, "commitSector", json!([1]), "0", "fcqa", TODAY - 4 * DAY);
    insert_block_with_message(&db, 3, "commitSector", json!([1]), "0", "fcqa", TODAY - 4 * DAY);
    insert_block_with_message(&db, 4, "commitSector", json!([2]), "0", "fcqa", TODAY - 3 * DAY);

    let stats = facade(&db, vec![]);
    let snapshot = stats.materialize_utilization_stats().await.unwrap();
    assert_eq!(snapshot.total_pledged_gb, BigDecimal::from(10));
    assert_eq!(snapshot.total_committed_gb, dec("0.5"));
    assert_eq!(snapshot.calculated_at, NOW);

    let amount = stats.historical_storage_amount(ChartDuration::Week).await.unwrap();
    assert_eq!(amount.last().unwrap().amount, BigDecimal::from(10));

    let utilization = stats.historical_utilization(ChartDuration::Week).await.unwrap();
    assert_eq!(utilization.last().unwrap().amount, dec("0.05"));
}
