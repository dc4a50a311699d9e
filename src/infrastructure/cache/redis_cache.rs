//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "snaplink:code:";

/// Redis cache for redirect lookups.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
pub struct RedisCache {
    manager: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {e}")))?;

        let mut conn = manager.clone();
        conn.ping::<()>()
            .await
            .map_err(|e| CacheError::Operation(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            manager,
            ttl_seconds,
        })
    }

    fn key(code: &str) -> String {
        format!("{KEY_PREFIX}{code}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_target(&self, code: &str) -> Option<String> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(Self::key(code)).await {
            Ok(target) => target,
            Err(e) => {
                warn!(code, error = %e, "Redis GET failed");
                None
            }
        }
    }

    async fn put_target(&self, code: &str, target_url: &str) {
        let mut conn = self.manager.clone();

        match conn
            .set_ex::<_, _, ()>(Self::key(code), target_url, self.ttl_seconds)
            .await
        {
            Ok(()) => debug!(code, ttl = self.ttl_seconds, "cached target"),
            Err(e) => warn!(code, error = %e, "Redis SET failed"),
        }
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.manager.clone();
        conn.ping::<()>().await.is_ok()
    }
}
