//! SQL implementations of the link store.
//!
//! # Repositories
//!
//! - [`SqliteLinkRepository`] - Embedded SQLite store (default)
//! - [`PgLinkRepository`] - PostgreSQL store
//!
//! [`open_repository`] picks the backend from `DATABASE_URL`, connects with
//! retries and applies the embedded migrations for that backend.

pub mod pg_link_repository;
mod rows;
pub mod sqlite_link_repository;

pub use pg_link_repository::PgLinkRepository;
pub use sqlite_link_repository::SqliteLinkRepository;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::config::{Config, DatabaseBackend, mask_connection_string};
use crate::domain::repositories::LinkRepository;

/// Connects to the configured database, runs migrations and returns the store.
///
/// # Errors
///
/// Returns an error if the URL scheme is unsupported, the database stays
/// unreachable after `db_connect_retries` attempts, or a migration fails.
pub async fn open_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let pool = DatabasePool::connect(config).await?;
    pool.migrate().await?;
    Ok(pool.into_repository())
}

/// Connection pool for whichever backend `DATABASE_URL` selects.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    Sqlite(SqlitePool),
    Postgres(PgPool),
}

impl DatabasePool {
    /// Opens a pool, retrying with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL scheme is unsupported or every attempt fails.
    pub async fn connect(config: &Config) -> Result<Self> {
        match config.database_backend() {
            Some(DatabaseBackend::Sqlite) => Ok(Self::Sqlite(connect_sqlite(config).await?)),
            Some(DatabaseBackend::Postgres) => Ok(Self::Postgres(connect_postgres(config).await?)),
            None => anyhow::bail!(
                "Unsupported DATABASE_URL '{}'",
                mask_connection_string(&config.database_url)
            ),
        }
    }

    pub fn backend(&self) -> DatabaseBackend {
        match self {
            Self::Sqlite(_) => DatabaseBackend::Sqlite,
            Self::Postgres(_) => DatabaseBackend::Postgres,
        }
    }

    /// Applies the embedded migrations for this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite")
                .run(pool)
                .await
                .context("Failed to run SQLite migrations")?,
            Self::Postgres(pool) => sqlx::migrate!("./migrations/postgres")
                .run(pool)
                .await
                .context("Failed to run PostgreSQL migrations")?,
        }

        tracing::info!(backend = ?self.backend(), "Database migrations applied");
        Ok(())
    }

    pub fn into_repository(self) -> Arc<dyn LinkRepository> {
        match self {
            Self::Sqlite(pool) => Arc::new(SqliteLinkRepository::new(Arc::new(pool))),
            Self::Postgres(pool) => Arc::new(PgLinkRepository::new(Arc::new(pool))),
        }
    }
}

fn retry_strategy(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(50)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(attempts.saturating_sub(1))
}

async fn connect_sqlite(config: &Config) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .context("Invalid SQLite connection string")?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout));

    // Each connection to `:memory:` is a separate database, so keep exactly one
    // connection alive for the life of the pool.
    let pool_options = if config.database_url.contains(":memory:") {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options
            .max_connections(config.db_max_connections)
            .idle_timeout(Duration::from_secs(config.db_idle_timeout))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime))
    };

    Retry::start(retry_strategy(config.db_connect_retries), || {
        let options = options.clone();
        let pool_options = pool_options.clone();
        async move {
            pool_options.connect_with(options).await.inspect_err(|e| {
                tracing::warn!(error = %e, "SQLite connection attempt failed");
            })
        }
    })
    .await
    .context("Failed to connect to SQLite")
}

async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let pool_options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    Retry::start(retry_strategy(config.db_connect_retries), || {
        let pool_options = pool_options.clone();
        async move {
            pool_options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| {
                    tracing::warn!(error = %e, "PostgreSQL connection attempt failed");
                })
        }
    })
    .await
    .context("Failed to connect to PostgreSQL")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(database_url: &str) -> Config {
        Config {
            database_url: database_url.to_string(),
            db_connect_retries: 2,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_open_repository_connects_and_migrates_sqlite() {
        let repository = open_repository(&config_for("sqlite::memory:"))
            .await
            .unwrap();

        repository.ping().await.unwrap();
        assert_eq!(repository.count_visits("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_connect_rejects_unsupported_url() {
        let err = DatabasePool::connect(&config_for("mysql://user:secret@db/links"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Unsupported DATABASE_URL"));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn test_retry_strategy_counts_first_attempt() {
        assert_eq!(retry_strategy(5).count(), 4);
        assert_eq!(retry_strategy(1).count(), 0);
    }
}
