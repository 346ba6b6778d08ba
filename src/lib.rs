//! Storage Network Statistics Engine
//!
//! Temporal aggregation and reconciliation over a live miner registry and an
//! append-only chain ledger: gap-filled duration series, capacity histograms,
//! producer distributions, cost/capacity cohorts and reconciled miner stats.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod registry;
pub mod stats;
pub mod types;
pub mod utils;
