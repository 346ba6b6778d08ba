//! Shared helpers: decimal arithmetic, token units and time bucketing

pub mod currency;
pub mod math;
pub mod time;
