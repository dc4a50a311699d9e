//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{LinkRow, VisitRow};
use crate::domain::entities::{Link, NewLink, NewVisit, Visit};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};

/// PostgreSQL repository for links and visits.
///
/// Code uniqueness is enforced by the primary key on `links.code`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> StoreResult<Link> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (code, target_url)
            VALUES ($1, $2)
            ON CONFLICT (code) DO NOTHING
            RETURNING code, target_url, created_at, click_count
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| StoreError::from_write(e, &new_link.code))?;

        row.map(Link::from).ok_or(StoreError::Conflict {
            code: new_link.code,
        })
    }

    async fn get(&self, code: &str) -> StoreResult<Link> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, target_url, created_at, click_count
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from).ok_or_else(|| StoreError::NotFound {
            code: code.to_string(),
        })
    }

    async fn increment_click_count(&self, code: &str) -> StoreResult<()> {
        let result = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                code: code.to_string(),
            });
        }

        Ok(())
    }

    async fn record_visit(&self, visit: NewVisit) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO visits (link_code, occurred_at, client_ip, user_agent, referer)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&visit.link_code)
        .bind(visit.occurred_at)
        .bind(&visit.client_ip)
        .bind(&visit.user_agent)
        .bind(&visit.referer)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn recent_visits(&self, code: &str, limit: i64) -> StoreResult<Vec<Visit>> {
        let rows = sqlx::query_as::<_, VisitRow>(
            r#"
            SELECT id, link_code, occurred_at, client_ip, user_agent, referer
            FROM visits
            WHERE link_code = $1
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(code)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn count_visits(&self, code: &str) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visits WHERE link_code = $1")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
