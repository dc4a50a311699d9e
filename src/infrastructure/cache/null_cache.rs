//! No-op cache implementation.

use super::service::CacheService;
use async_trait::async_trait;
use tracing::debug;

/// A cache that stores nothing.
///
/// Used when `REDIS_URL` is unset or Redis is unreachable at startup, and in
/// tests that should always hit the store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_target(&self, _code: &str) -> Option<String> {
        None
    }

    async fn put_target(&self, _code: &str, _target_url: &str) {}

    fn is_enabled(&self) -> bool {
        false
    }

    async fn health_check(&self) -> bool {
        true
    }
}
