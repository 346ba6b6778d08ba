//! Fixed-width histogram with an open-ended overflow bucket
//!
//! With width `w` and `K` buckets, bucket `n` in `1..K` reports the range
//! `[w(n-1) + 1, w·n]` and holds samples in `(w(n-1), w·n]`; bucket 1 also
//! takes everything at or below zero. Bucket `K` starts at `w(K-1) + 1`, has
//! `range_end = 0` and holds every sample above `w(K-1)`. A sample sitting
//! exactly on a boundary lands in the lower bucket.

use crate::errors::{AppError, AppResult};
use crate::types::HistogramBucket;
use bigdecimal::{BigDecimal, One, Zero};

pub struct HistogramBucketer;

impl HistogramBucketer {
    pub fn bucketize(
        samples: &[BigDecimal],
        width: &BigDecimal,
        bucket_count: u32,
    ) -> AppResult<Vec<HistogramBucket>> {
        if bucket_count == 0 {
            return Err(AppError::InvalidData(
                "histogram needs at least one bucket".to_string(),
            ));
        }
        if width <= &BigDecimal::zero() {
            return Err(AppError::InvalidData(format!(
                "histogram bucket width must be positive, got {}",
                width
            )));
        }

        // Upper bound of each fixed bucket: w, 2w, ..., (K-1)w
        let upper_bounds: Vec<BigDecimal> = (1..bucket_count)
            .map(|n| width * BigDecimal::from(n))
            .collect();

        let mut counts = vec![0u64; bucket_count as usize];
        for sample in samples {
            let slot = upper_bounds
                .iter()
                .position(|upper| sample <= upper)
                .unwrap_or(upper_bounds.len());
            counts[slot] += 1;
        }

        Ok(counts
            .into_iter()
            .enumerate()
            .map(|(slot, count)| {
                let lower = width * BigDecimal::from(slot as u64);
                let is_overflow = slot == upper_bounds.len();
                HistogramBucket {
                    index: slot as u32 + 1,
                    range_start: &lower + BigDecimal::one(),
                    range_end: if is_overflow {
                        BigDecimal::zero()
                    } else {
                        width * BigDecimal::from(slot as u64 + 1)
                    },
                    count,
                }
            })
            .collect())
    }
}
