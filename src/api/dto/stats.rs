//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::LinkStats;
use crate::domain::entities::Visit;

/// Query parameters for `GET /stats/{code}`.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub code: String,
    pub target_url: String,
    pub click_count: i64,
    pub visit_count: i64,
    pub created_at: DateTime<Utc>,
    pub recent_visits: Vec<VisitInfo>,
}

/// A single visit as exposed by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitInfo {
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

impl From<Visit> for VisitInfo {
    fn from(visit: Visit) -> Self {
        Self {
            occurred_at: visit.occurred_at,
            client_ip: visit.client_ip,
            user_agent: visit.user_agent,
            referer: visit.referer,
        }
    }
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            code: stats.link.code,
            target_url: stats.link.target_url,
            click_count: stats.link.click_count,
            visit_count: stats.visit_count,
            created_at: stats.link.created_at,
            recent_visits: stats.recent_visits.into_iter().map(VisitInfo::from).collect(),
        }
    }
}
