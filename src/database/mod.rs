//! SQLite-backed ledger store and block index.
//!
//! ## Architecture
//!
//! The `Database` struct wraps one SQLite connection and implements the
//! collaborator traits consumed by the statistics engine:
//! - `LedgerStore` - messages, asks, block counts, snapshots
//! - `BlockIndex` - top block and blocks by height
//!
//! Every query runs on the blocking thread pool so no async worker is held
//! while SQLite works. Metrics that need several reads get them from one
//! transaction via `run_transaction`.

mod blocks;
mod ledger;
pub mod query_helper;
pub mod schema;
pub mod traits;

pub use query_helper::QueryHelper;
pub use schema::setup_schema;
pub use traits::{BlockIndex, HeightSelection, LedgerStore, UsageCalculation};

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite ledger, cheaply cloneable
#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the ledger at `database_path` and initialise the schema.
    /// `:memory:` gives an isolated in-memory ledger.
    pub fn new(database_path: &str) -> AppResult<Self> {
        let connection = Connection::open(database_path)?;
        setup_schema(&connection)?;

        info!("Database initialised at: {}", database_path);
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run `f` against the connection on the current thread
    pub fn with_connection<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&Connection) -> AppResult<R>,
    {
        let guard = self
            .connection
            .lock()
            .map_err(|_| AppError::Task("database connection lock poisoned".to_string()))?;
        f(&guard)
    }

    /// Execute a function within a database transaction
    pub fn execute_transaction<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&rusqlite::Transaction) -> AppResult<R>,
    {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| AppError::Task("database connection lock poisoned".to_string()))?;
        let tx = guard.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Run `f` against the connection on the blocking thread pool
    pub(crate) async fn run_blocking<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&Connection) -> AppResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_connection(f)).await?
    }

    /// Run `f` inside one transaction on the blocking thread pool, so every
    /// read it makes sees the same snapshot
    pub(crate) async fn run_transaction<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&rusqlite::Transaction) -> AppResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.execute_transaction(f)).await?
    }
}
