//! Repository trait for the link store.

use crate::domain::entities::{Link, NewLink, NewVisit, Visit};
use async_trait::async_trait;

/// Failures reported by a [`LinkRepository`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A link with this code already exists.
    #[error("short code `{code}` already exists")]
    Conflict { code: String },

    /// No link with this code exists.
    #[error("short code `{code}` not found")]
    NotFound { code: String },

    /// The storage engine could not be reached or rejected the operation.
    #[error("link store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies a driver error raised by a write on `code`.
    ///
    /// Unique-key violations become [`StoreError::Conflict`]; anything else is
    /// treated as the store being unavailable.
    pub fn from_write(err: sqlx::Error, code: &str) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());

        if is_unique_violation {
            StoreError::Conflict {
                code: code.to_string(),
            }
        } else {
            StoreError::Unavailable(err)
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable mapping from short code to [`Link`], plus the visit log.
///
/// Implementations must enforce code uniqueness inside the storage engine.
/// [`Self::insert_if_absent`] is a single statement, never a lookup followed by an
/// insert.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link only if its code is not taken.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the code already exists.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn insert_if_absent(&self, new_link: NewLink) -> StoreResult<Link>;

    /// Fetches a link by code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the code is unknown.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn get(&self, code: &str) -> StoreResult<Link>;

    /// Atomically adds one to the link's click counter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the code is unknown.
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn increment_click_count(&self, code: &str) -> StoreResult<()>;

    /// Appends a visit row. Does not touch the click counter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn record_visit(&self, visit: NewVisit) -> StoreResult<()>;

    /// Returns up to `limit` visits for a code, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn recent_visits(&self, code: &str, limit: i64) -> StoreResult<Vec<Visit>>;

    /// Counts visit rows referencing a code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] on database errors.
    async fn count_visits(&self, code: &str) -> StoreResult<i64>;

    /// Cheap round-trip used by health checks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the engine does not answer.
    async fn ping(&self) -> StoreResult<()>;
}
