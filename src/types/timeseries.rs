use crate::errors::{AppError, AppResult};
use crate::utils::time::{truncate_to_day, truncate_to_hour, truncate_to_month, truncate_to_week};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One dated amount of a time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    /// Bucket boundary, Unix epoch seconds
    pub date: i64,
    pub amount: BigDecimal,
}

impl TimeseriesPoint {
    pub fn new(date: i64, amount: BigDecimal) -> Self {
        Self { date, amount }
    }
}

/// Requested chart span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartDuration {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl ChartDuration {
    pub const ALL: [ChartDuration; 5] = [
        ChartDuration::Day,
        ChartDuration::Week,
        ChartDuration::Month,
        ChartDuration::Quarter,
        ChartDuration::Year,
    ];

    /// Bucket granularity used for this span
    pub fn granularity(self) -> Granularity {
        match self {
            ChartDuration::Day => Granularity::Hour,
            ChartDuration::Week => Granularity::Day,
            ChartDuration::Month => Granularity::Day,
            ChartDuration::Quarter => Granularity::Week,
            ChartDuration::Year => Granularity::Month,
        }
    }

    /// `now` minus this span (calendar months for the longer spans)
    pub fn span_start(self, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        let start = match self {
            ChartDuration::Day => now.checked_sub_signed(Duration::days(1)),
            ChartDuration::Week => now.checked_sub_signed(Duration::days(7)),
            ChartDuration::Month => now.checked_sub_months(Months::new(1)),
            ChartDuration::Quarter => now.checked_sub_months(Months::new(3)),
            ChartDuration::Year => now.checked_sub_months(Months::new(12)),
        };
        start.ok_or_else(|| AppError::InvalidData(format!("cannot subtract {} from {}", self, now)))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChartDuration::Day => "day",
            ChartDuration::Week => "week",
            ChartDuration::Month => "month",
            ChartDuration::Quarter => "quarter",
            ChartDuration::Year => "year",
        }
    }
}

impl fmt::Display for ChartDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base unit of a duration series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Floor `dt` to the start of its bucket
    pub fn truncate(self, dt: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        match self {
            Granularity::Hour => Ok(truncate_to_hour(dt)),
            Granularity::Day => Ok(truncate_to_day(dt)),
            Granularity::Week => Ok(truncate_to_week(dt)),
            Granularity::Month => truncate_to_month(dt),
        }
    }

    /// Advance an aligned boundary by one unit
    pub fn step(self, dt: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        let next = match self {
            Granularity::Hour => dt.checked_add_signed(Duration::hours(1)),
            Granularity::Day => dt.checked_add_signed(Duration::days(1)),
            Granularity::Week => dt.checked_add_signed(Duration::weeks(1)),
            Granularity::Month => dt.checked_add_months(Months::new(1)),
        };
        next.ok_or_else(|| AppError::InvalidData(format!("cannot step {:?} past {}", self, dt)))
    }
}
