//! Visit statistics service.

use std::sync::Arc;

use crate::domain::entities::{Link, Visit};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Default number of recent visits returned with link statistics.
pub const DEFAULT_RECENT_VISITS: i64 = 20;

/// Upper bound for the number of recent visits returned.
pub const MAX_RECENT_VISITS: i64 = 100;

/// Statistics for a single link.
///
/// `link.click_count` and `visit_count` are maintained by two independent writes
/// and may drift apart if one of them fails.
#[derive(Debug, Clone)]
pub struct LinkStats {
    pub link: Link,
    pub visit_count: i64,
    pub recent_visits: Vec<Visit>,
}

/// Read-only access to link counters and the visit log.
pub struct StatsService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> StatsService<R> {
    /// Creates a new statistics service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Retrieves the link, its visit row count and the most recent visits.
    ///
    /// `limit` is clamped to `1..=MAX_RECENT_VISITS`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    /// Returns [`AppError::StoreUnavailable`] on database errors.
    pub async fn get_stats(&self, code: &str, limit: i64) -> Result<LinkStats, AppError> {
        let link = self.repository.get(code).await?;

        let limit = limit.clamp(1, MAX_RECENT_VISITS);
        let (visit_count, recent_visits) = tokio::try_join!(
            self.repository.count_visits(code),
            self.repository.recent_visits(code, limit),
        )?;

        Ok(LinkStats {
            link,
            visit_count,
            recent_visits,
        })
    }
}
