//! Projection of sparse dated samples onto a `DurationSeries`
//!
//! Aggregation is two steps. `bucketize` reduces every in-window sample into
//! its bucket (`None` where no sample landed). `fill` then turns the sparse
//! buckets into a dense series according to the metric's fill policy. Ratio
//! metrics bucketize numerator and denominator separately and `combine` them.
//!
//! ## Fill policies
//!
//! - **ForwardFill**: an empty bucket takes the maximum value of any earlier
//!   bucket (zero before the first sample). A bucket holding an explicit zero
//!   keeps its zero.
//! - **ZeroFill**: an empty bucket is zero.
//! - **CumulativeSum**: every bucket is the running total of all buckets so far.

use super::duration_series::DurationSeries;
use crate::errors::AppResult;
use crate::types::TimeseriesPoint;
use crate::utils::math::safe_ratio;
use bigdecimal::{BigDecimal, Zero};

/// How samples sharing a bucket are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketReducer {
    Sum,
    Mean,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    ForwardFill,
    ZeroFill,
    CumulativeSum,
}

#[derive(Default)]
struct Accumulator {
    sum: BigDecimal,
    max: Option<BigDecimal>,
    count: u64,
}

impl Accumulator {
    fn push(&mut self, amount: &BigDecimal) {
        self.sum += amount;
        self.count += 1;
        if self.max.as_ref().map_or(true, |max| amount > max) {
            self.max = Some(amount.clone());
        }
    }

    fn reduce(self, reducer: BucketReducer) -> Option<BigDecimal> {
        if self.count == 0 {
            return None;
        }
        match reducer {
            BucketReducer::Sum => Some(self.sum),
            BucketReducer::Mean => Some(safe_ratio(&self.sum, &BigDecimal::from(self.count))),
            BucketReducer::Max => self.max,
        }
    }
}

pub struct TimeseriesAggregator;

impl TimeseriesAggregator {
    /// Reduce samples into buckets; samples outside the window are ignored
    pub fn bucketize(
        series: &DurationSeries,
        samples: &[TimeseriesPoint],
        reducer: BucketReducer,
    ) -> AppResult<Vec<Option<BigDecimal>>> {
        let mut accumulators: Vec<Accumulator> =
            (0..series.len()).map(|_| Accumulator::default()).collect();

        for sample in samples {
            if let Some(idx) = series.bucket_index(sample.date)? {
                accumulators[idx].push(&sample.amount);
            }
        }

        Ok(accumulators
            .into_iter()
            .map(|acc| acc.reduce(reducer))
            .collect())
    }

    /// Densify bucket values into one point per boundary
    pub fn fill(
        series: &DurationSeries,
        buckets: Vec<Option<BigDecimal>>,
        policy: FillPolicy,
    ) -> Vec<TimeseriesPoint> {
        let mut max_seen: Option<BigDecimal> = None;
        let mut running_total = BigDecimal::zero();

        series
            .buckets()
            .iter()
            .zip(buckets)
            .map(|(date, value)| {
                let amount = match (policy, value) {
                    (FillPolicy::ZeroFill, value) => value.unwrap_or_else(BigDecimal::zero),
                    (FillPolicy::ForwardFill, Some(value)) => {
                        if max_seen.as_ref().map_or(true, |max| value > *max) {
                            max_seen = Some(value.clone());
                        }
                        value
                    }
                    (FillPolicy::ForwardFill, None) => {
                        max_seen.clone().unwrap_or_else(BigDecimal::zero)
                    }
                    (FillPolicy::CumulativeSum, value) => {
                        if let Some(value) = value {
                            running_total += value;
                        }
                        running_total.clone()
                    }
                };
                TimeseriesPoint::new(*date, amount)
            })
            .collect()
    }

    pub fn aggregate(
        series: &DurationSeries,
        samples: &[TimeseriesPoint],
        reducer: BucketReducer,
        policy: FillPolicy,
    ) -> AppResult<Vec<TimeseriesPoint>> {
        let buckets = Self::bucketize(series, samples, reducer)?;
        Ok(Self::fill(series, buckets, policy))
    }

    /// Per-bucket `numerator / denominator`; zero where either side is empty
    /// or the denominator is zero
    pub fn combine(
        series: &DurationSeries,
        numerators: Vec<Option<BigDecimal>>,
        denominators: Vec<Option<BigDecimal>>,
    ) -> Vec<TimeseriesPoint> {
        series
            .buckets()
            .iter()
            .zip(numerators.into_iter().zip(denominators))
            .map(|(date, pair)| {
                let amount = match pair {
                    (Some(num), Some(den)) => safe_ratio(&num, &den),
                    (None, Some(_)) | (_, None) => BigDecimal::zero(),
                };
                TimeseriesPoint::new(*date, amount)
            })
            .collect()
    }
}
