//! Time utilities for temporal analysis
//!
//! Truncation helpers behave like SQL `date_trunc` in UTC: weeks start on
//! Monday 00:00, months on the first day at 00:00.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Seconds in an hour
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Seconds in a day (24 × 60 × 60 = 86400)
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds in a week (7 × 24 × 60 × 60 = 604800)
pub const SECONDS_PER_WEEK: i64 = 604_800;

/// Convert a Unix timestamp to a UTC datetime
pub fn timestamp_to_datetime(timestamp: i64) -> AppResult<DateTime<Utc>> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .ok_or_else(|| AppError::InvalidData(format!("timestamp out of range: {}", timestamp)))
}

/// Start of the hour containing `dt`
pub fn truncate_to_hour(dt: DateTime<Utc>) -> DateTime<Utc> {
    let ts = dt.timestamp();
    let floored = ts - ts.rem_euclid(SECONDS_PER_HOUR);
    // Flooring an in-range timestamp stays in range
    Utc.timestamp_opt(floored, 0).single().unwrap_or(dt)
}

/// Start of the UTC day containing `dt`
pub fn truncate_to_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    let ts = dt.timestamp();
    let floored = ts - ts.rem_euclid(SECONDS_PER_DAY);
    Utc.timestamp_opt(floored, 0).single().unwrap_or(dt)
}

/// Start of the ISO week (Monday 00:00 UTC) containing `dt`
pub fn truncate_to_week(dt: DateTime<Utc>) -> DateTime<Utc> {
    let day = truncate_to_day(dt);
    day - Duration::days(i64::from(dt.weekday().num_days_from_monday()))
}

/// Start of the calendar month containing `dt`
pub fn truncate_to_month(dt: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
    let first = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| AppError::InvalidData(format!("cannot truncate {} to month", dt)))?;
    Ok(Utc.from_utc_datetime(&first))
}

/// Truncate a Unix timestamp to the start of its UTC day
pub fn day_of(timestamp: i64) -> i64 {
    timestamp - timestamp.rem_euclid(SECONDS_PER_DAY)
}
