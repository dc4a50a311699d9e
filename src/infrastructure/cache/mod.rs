//! Read-through cache for code to target lookups.
//!
//! Links never change once created, so cached entries only expire by TTL.
//!
//! - [`RedisCache`] - Redis-backed cache
//! - [`NullCache`] - No-op implementation used when Redis is not configured

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
#[cfg(test)]
pub use service::MockCacheService;
pub use service::{CacheError, CacheResult, CacheService};
