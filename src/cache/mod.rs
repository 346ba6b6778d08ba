//! Single-flight TTL cache for metric computations
//!
//! Every exposed metric is computed through `SingleFlightCache::wrap`, backed
//! by `moka::future::Cache`. Concurrent calls on the same key coalesce into a
//! single computation. Successful values live for the configured TTL and are
//! recomputed lazily on the first access after expiry. Failures are delivered
//! to every waiting caller and never stored.

use crate::errors::{AppError, AppResult};
use moka::future::Cache;
use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

type CachedValue = Arc<dyn Any + Send + Sync>;

/// Request counters since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls to `wrap`
    pub requests: u64,
    /// Computations actually run
    pub computations: u64,
}

pub struct SingleFlightCache {
    entries: Cache<String, CachedValue>,
    requests: AtomicU64,
    computations: Arc<AtomicU64>,
}

impl SingleFlightCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
            requests: AtomicU64::new(0),
            computations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return the value cached under `key`, computing it with `compute` when
    /// absent or expired. The future `compute` returns is only polled when
    /// this call leads the computation.
    pub async fn wrap<T, F, Fut>(&self, key: &str, compute: F) -> AppResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let computations = Arc::clone(&self.computations);
        let pending = compute();
        let owned_key = key.to_string();

        // Multiple concurrent calls of this coalesce into a single execution
        let value = self
            .entries
            .try_get_with(key.to_string(), async move {
                computations.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for '{}', computing", owned_key);
                match pending.await {
                    Ok(value) => Ok(Arc::new(value) as CachedValue),
                    Err(e) => {
                        debug!("Computation for '{}' failed, not caching: {}", owned_key, e);
                        Err(e)
                    }
                }
            })
            .await
            .map_err(AppError::Shared)?;

        downcast(key, value)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            requests: self.requests.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
        }
    }

    /// Whether a live value is held under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

fn downcast<T: Clone + Send + Sync + 'static>(key: &str, value: CachedValue) -> AppResult<T> {
    value
        .downcast::<T>()
        .map(|typed| (*typed).clone())
        .map_err(|_| {
            AppError::Cache(format!(
                "key '{}' holds a value of a different type than requested",
                key
            ))
        })
}
