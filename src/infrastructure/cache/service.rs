//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur while setting up a cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of code to target URL mappings.
///
/// Lookups are fail-open: a backend error is logged and reported as a miss so
/// the resolver falls back to the link store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached target for `code`, or `None` on a miss or backend error.
    async fn get_target(&self, code: &str) -> Option<String>;

    /// Stores the target for `code`. Failures are logged, never returned.
    async fn put_target(&self, code: &str, target_url: &str);

    /// Whether a real backend is configured.
    fn is_enabled(&self) -> bool;

    /// Checks if the cache backend answers.
    async fn health_check(&self) -> bool;
}
