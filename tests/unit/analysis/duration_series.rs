//! Duration series alignment across every chart span

use crate::common::NOW;
use chrono::{Datelike, TimeZone, Timelike, Utc};
use storage_network_stats::analysis::DurationSeries;
use storage_network_stats::stats::{Clock, FixedClock};
use storage_network_stats::types::{ChartDuration, Granularity};

#[test]
fn test_every_duration_is_aligned_and_ends_at_now() {
    let now = FixedClock::at_timestamp(NOW).unwrap().now();

    for duration in ChartDuration::ALL {
        let series = DurationSeries::generate(duration, now).unwrap();
        let granularity = duration.granularity();
        assert_eq!(series.granularity(), granularity);

        let buckets = series.buckets();
        assert!(buckets.len() >= 2, "{}", duration);
        assert!(buckets.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            *buckets.last().unwrap(),
            granularity.truncate(now).unwrap().timestamp()
        );

        for &boundary in buckets {
            let dt = Utc.timestamp_opt(boundary, 0).unwrap();
            assert_eq!(granularity.truncate(dt).unwrap(), dt, "{} not aligned", boundary);
        }
    }
}

#[test]
fn test_month_buckets_follow_calendar_months() {
    let now = Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 0).unwrap();
    let series = DurationSeries::generate(ChartDuration::Year, now).unwrap();

    assert_eq!(series.len(), 13);
    for &boundary in series.buckets() {
        let dt = Utc.timestamp_opt(boundary, 0).unwrap();
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
    }
}

#[test]
fn test_week_buckets_start_on_monday() {
    let now = FixedClock::at_timestamp(NOW).unwrap().now();
    let series = DurationSeries::generate(ChartDuration::Quarter, now).unwrap();

    assert_eq!(series.granularity(), Granularity::Week);
    for &boundary in series.buckets() {
        let dt = Utc.timestamp_opt(boundary, 0).unwrap();
        assert_eq!(dt.weekday(), chrono::Weekday::Mon);
    }
}

#[test]
fn test_bucket_index_outside_window() {
    let now = FixedClock::at_timestamp(NOW).unwrap().now();
    let series = DurationSeries::generate(ChartDuration::Day, now).unwrap();

    assert_eq!(series.bucket_index(NOW).unwrap(), Some(series.len() - 1));
    assert_eq!(series.bucket_index(NOW + 3_600).unwrap(), None);
    assert_eq!(series.bucket_index(NOW - 3 * 86_400).unwrap(), None);
}
