//! Exact decimal utility functions for statistical analysis
//!
//! Every division is guarded against a zero denominator and returns zero in
//! that case, so empty cohorts and empty windows degrade to zero values.

use crate::errors::{AppError, AppResult};
use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

/// Divide `part` by `total`, returning zero if total is zero.
///
/// # Examples
/// ```
/// use storage_network_stats::utils::math::safe_ratio;
/// use bigdecimal::BigDecimal;
///
/// assert_eq!(safe_ratio(&BigDecimal::from(1), &BigDecimal::from(4)), "0.25".parse::<BigDecimal>().unwrap());
/// assert_eq!(safe_ratio(&BigDecimal::from(5), &BigDecimal::from(0)), BigDecimal::from(0));
/// ```
pub fn safe_ratio(part: &BigDecimal, total: &BigDecimal) -> BigDecimal {
    if total.is_zero() {
        BigDecimal::zero()
    } else {
        part / total
    }
}

/// Fraction of `total` represented by `count`, returning zero if total is zero.
pub fn share(count: u64, total: u64) -> BigDecimal {
    safe_ratio(&BigDecimal::from(count), &BigDecimal::from(total))
}

/// Arithmetic mean, zero for an empty input
pub fn mean<'a, I>(values: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    let (sum, count) = values
        .into_iter()
        .fold((BigDecimal::zero(), 0u64), |(sum, count), value| {
            (sum + value, count + 1)
        });
    safe_ratio(&sum, &BigDecimal::from(count))
}

/// Sum of a sequence of decimals
pub fn sum<'a, I>(values: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    values
        .into_iter()
        .fold(BigDecimal::zero(), |acc, value| acc + value)
}

/// Parse a stored decimal column, naming the field on failure
pub fn parse_decimal(raw: &str, field: &str) -> AppResult<BigDecimal> {
    BigDecimal::from_str(raw.trim()).map_err(|e| {
        AppError::InvalidData(format!("{} is not a decimal ({:?}): {}", field, raw, e))
    })
}

/// Interpret a JSON message parameter as a decimal (number or numeric string)
pub fn decimal_from_json(value: &serde_json::Value) -> Option<BigDecimal> {
    match value {
        serde_json::Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => BigDecimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
