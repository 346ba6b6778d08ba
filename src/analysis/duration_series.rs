//! Bucket boundaries for a requested chart span
//!
//! A `DurationSeries` is a pure function of `(duration, now)`: boundaries run
//! from `truncate(now - span)` to `truncate(now)` inclusive, one base unit
//! apart. A `now` that already sits on a boundary appears exactly once.

use crate::errors::AppResult;
use crate::types::{ChartDuration, Granularity};
use crate::utils::time::timestamp_to_datetime;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationSeries {
    buckets: Vec<i64>,
    granularity: Granularity,
}

impl DurationSeries {
    pub fn generate(duration: ChartDuration, now: DateTime<Utc>) -> AppResult<Self> {
        let granularity = duration.granularity();
        let end = granularity.truncate(now)?;
        let mut cursor = granularity.truncate(duration.span_start(now)?)?;

        let mut buckets = Vec::new();
        while cursor <= end {
            buckets.push(cursor.timestamp());
            cursor = granularity.step(cursor)?;
        }

        Ok(Self {
            buckets,
            granularity,
        })
    }

    /// Ascending bucket boundaries, Unix epoch seconds
    pub fn buckets(&self) -> &[i64] {
        &self.buckets
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// First boundary of the window
    pub fn start(&self) -> Option<i64> {
        self.buckets.first().copied()
    }

    /// Index of the bucket containing `timestamp`, `None` outside the window
    pub fn bucket_index(&self, timestamp: i64) -> AppResult<Option<usize>> {
        let boundary = self
            .granularity
            .truncate(timestamp_to_datetime(timestamp)?)?
            .timestamp();
        Ok(self.buckets.binary_search(&boundary).ok())
    }
}
