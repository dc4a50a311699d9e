//! Read path from short code to target URL.

use std::sync::Arc;

use tracing::debug;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Resolves codes to their stored target.
///
/// A read-through cache sits in front of the store. Links are immutable, so a
/// cached target is always the stored one. Cache fills run on a spawned task and
/// never delay the caller.
pub struct Resolver<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: LinkRepository + ?Sized> Resolver<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Returns the target URL for `code`, exactly as it was submitted.
    ///
    /// Does not record a visit; the redirect handler hands that to the
    /// analytics recorder.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has this code
    /// - [`AppError::StoreUnavailable`] if the store cannot be read
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if let Some(target) = self.cache.get_target(code).await {
            debug!(code, "cache hit");
            metrics::counter!("snaplink_cache_hits_total").increment(1);
            return Ok(target);
        }

        if self.cache.is_enabled() {
            metrics::counter!("snaplink_cache_misses_total").increment(1);
        }

        let link = self.repository.get(code).await?;

        if self.cache.is_enabled() {
            let cache = Arc::clone(&self.cache);
            let code = link.code.clone();
            let target = link.target_url.clone();
            tokio::spawn(async move {
                cache.put_target(&code, &target).await;
            });
        }

        Ok(link.target_url)
    }
}
