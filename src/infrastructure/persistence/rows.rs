//! Row types shared by the SQL backends.

use chrono::{DateTime, Utc};

use crate::domain::entities::{Link, Visit};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link::new(row.code, row.target_url, row.created_at, row.click_count)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VisitRow {
    pub id: i64,
    pub link_code: String,
    pub occurred_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: row.id,
            link_code: row.link_code,
            occurred_at: row.occurred_at,
            client_ip: row.client_ip,
            user_agent: row.user_agent,
            referer: row.referer,
        }
    }
}
