//! Token unit conversion
//!
//! Ledger values (collateral, ask prices) are recorded in base units. The
//! statistics engine reports whole tokens, computed exactly.

use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Base units per whole token for the given number of decimals
///
/// # Examples
/// ```
/// use storage_network_stats::utils::currency::base_units_per_token;
/// use bigdecimal::BigDecimal;
///
/// assert_eq!(base_units_per_token(3), BigDecimal::from(1000));
/// assert_eq!(base_units_per_token(0), BigDecimal::from(1));
/// ```
pub fn base_units_per_token(decimals: u32) -> BigDecimal {
    // "1" followed by `decimals` zeros always parses
    BigDecimal::from_str(&format!("1{}", "0".repeat(decimals as usize)))
        .unwrap_or_else(|_| BigDecimal::from(1))
}

/// Convert an amount in base units to whole tokens
pub fn to_tokens(base_units: &BigDecimal, decimals: u32) -> BigDecimal {
    base_units / base_units_per_token(decimals)
}
