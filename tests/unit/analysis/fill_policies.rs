//! Reducers and fill policies over a daily series

use crate::common::{dec, DAY, NOW, TODAY};
use bigdecimal::BigDecimal;
use storage_network_stats::analysis::{
    BucketReducer, DurationSeries, FillPolicy, TimeseriesAggregator, TrendCalculator,
};
use storage_network_stats::stats::{Clock, FixedClock};
use storage_network_stats::types::{ChartDuration, TimeseriesPoint};

fn week() -> DurationSeries {
    let now = FixedClock::at_timestamp(NOW).unwrap().now();
    DurationSeries::generate(ChartDuration::Week, now).unwrap()
}

fn samples() -> Vec<TimeseriesPoint> {
    vec![
        TimeseriesPoint::new(TODAY - 5 * DAY + 1, dec("4")),
        TimeseriesPoint::new(TODAY - 5 * DAY + 2, dec("2")),
        TimeseriesPoint::new(TODAY - 2 * DAY, dec("0")),
        TimeseriesPoint::new(TODAY + 7, dec("1.5")),
    ]
}

fn amounts(points: &[TimeseriesPoint]) -> Vec<BigDecimal> {
    points.iter().map(|p| p.amount.clone()).collect()
}

fn decs(values: &[&str]) -> Vec<BigDecimal> {
    values.iter().map(|v| dec(v)).collect()
}

#[test]
fn test_zero_fill_sum() {
    let points =
        TimeseriesAggregator::aggregate(&week(), &samples(), BucketReducer::Sum, FillPolicy::ZeroFill)
            .unwrap();
    assert_eq!(points.len(), 8);
    assert_eq!(amounts(&points), decs(&["0", "0", "6", "0", "0", "0", "0", "1.5"]));
}

#[test]
fn test_zero_fill_mean() {
    let points =
        TimeseriesAggregator::aggregate(&week(), &samples(), BucketReducer::Mean, FillPolicy::ZeroFill)
            .unwrap();
    assert_eq!(amounts(&points), decs(&["0", "0", "3", "0", "0", "0", "0", "1.5"]));
}

#[test]
fn test_forward_fill_keeps_explicit_zero() {
    let points = TimeseriesAggregator::aggregate(
        &week(),
        &samples(),
        BucketReducer::Max,
        FillPolicy::ForwardFill,
    )
    .unwrap();
    assert_eq!(amounts(&points), decs(&["0", "0", "4", "4", "4", "0", "4", "1.5"]));
}

#[test]
fn test_cumulative_sum_is_monotone() {
    let points = TimeseriesAggregator::aggregate(
        &week(),
        &samples(),
        BucketReducer::Sum,
        FillPolicy::CumulativeSum,
    )
    .unwrap();
    assert_eq!(amounts(&points), decs(&["0", "0", "6", "6", "6", "6", "6", "7.5"]));
}

#[test]
fn test_trend_of_filled_series() {
    let points =
        TimeseriesAggregator::aggregate(&week(), &samples(), BucketReducer::Sum, FillPolicy::ZeroFill)
            .unwrap();
    // Penultimate bucket is zero and the last positive
    assert_eq!(TrendCalculator::trend(&points), BigDecimal::from(1));
    assert_eq!(TrendCalculator::trend(&[]), BigDecimal::from(0));
}
