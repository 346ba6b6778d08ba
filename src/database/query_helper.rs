//! Query helper utilities for common database patterns
//!
//! This module consolidates repeated query patterns across the ledger store:
//! - Single aggregate queries (COUNT, MAX) with NULL → default handling
//! - Multi-row collection with mapping
//!
//! Decimal columns are read as TEXT and parsed by the caller, never summed by
//! SQLite (whose SUM/AVG go through floating point).

use crate::errors::AppResult;
use rusqlite::{Connection, Params, Row};

/// Helper trait for common database query patterns
///
/// ## Usage Examples
///
/// ```ignore
/// use crate::database::QueryHelper;
///
/// let blocks = conn.safe_aggregate::<i64, _>(
///     "SELECT COUNT(*) FROM blocks WHERE ingested_at > ?1",
///     [since],
///     0,
/// )?;
///
/// let heights = conn.query_collect(
///     "SELECT height FROM blocks ORDER BY height",
///     [],
///     |row| row.get::<_, i64>(0),
/// )?;
/// ```
pub trait QueryHelper {
    /// Execute an aggregate query returning an optional value, with NULL → default
    fn safe_aggregate<T, P>(&self, sql: &str, params: P, default: T) -> AppResult<T>
    where
        T: rusqlite::types::FromSql,
        P: Params;

    /// Execute a query returning multiple rows, collecting into a Vec
    fn query_collect<T, P, F>(&self, sql: &str, params: P, mapper: F) -> AppResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row) -> rusqlite::Result<T>;
}

impl QueryHelper for Connection {
    fn safe_aggregate<T, P>(&self, sql: &str, params: P, default: T) -> AppResult<T>
    where
        T: rusqlite::types::FromSql,
        P: Params,
    {
        let result: Option<T> = self.query_row(sql, params, |row| row.get(0))?;
        Ok(result.unwrap_or(default))
    }

    fn query_collect<T, P, F>(&self, sql: &str, params: P, mut mapper: F) -> AppResult<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row) -> rusqlite::Result<T>,
    {
        let mut stmt = self.prepare(sql)?;
        let results = stmt
            .query_map(params, &mut mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }
}
