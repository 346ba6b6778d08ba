//! Relative change between the last two points of a series

use crate::types::TimeseriesPoint;
use bigdecimal::{BigDecimal, One, Zero};

pub struct TrendCalculator;

impl TrendCalculator {
    /// `(last - penultimate) / penultimate` when the penultimate amount is
    /// positive, otherwise `1` for a positive last amount and `0` else.
    /// An empty series has trend `0`.
    pub fn trend(points: &[TimeseriesPoint]) -> BigDecimal {
        let Some(last) = points.last() else {
            return BigDecimal::zero();
        };
        let zero = BigDecimal::zero();

        match points.len().checked_sub(2).map(|idx| &points[idx]) {
            Some(penultimate) if penultimate.amount > zero => {
                (&last.amount - &penultimate.amount) / &penultimate.amount
            }
            _ if last.amount > zero => BigDecimal::one(),
            _ => zero,
        }
    }
}
