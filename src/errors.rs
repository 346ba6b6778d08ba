use std::sync::Arc;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialisation
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Participant registry failures
    #[error("Registry error: {0}")]
    Registry(String),

    /// Cache bookkeeping failures (type mismatch on a key)
    #[error("Cache error: {0}")]
    Cache(String),

    /// A blocking database task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Failure of a computation shared by every caller of one cache key
    #[error("{0}")]
    Shared(Arc<AppError>),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Task(err.to_string())
    }
}

impl From<bigdecimal::ParseBigDecimalError> for AppError {
    fn from(err: bigdecimal::ParseBigDecimalError) -> Self {
        AppError::InvalidData(format!("Decimal parse error: {}", err))
    }
}

impl AppError {
    /// Unwrap a shared failure to the error that caused it
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Shared(inner) => inner.root(),
            other => other,
        }
    }
}
