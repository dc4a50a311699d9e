//! Visit entity representing a single resolution of a short code.

use chrono::{DateTime, Utc};

/// A persisted visit row.
///
/// `link_code` is a plain reference to [`super::Link::code`]; the store does not
/// enforce it as a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: i64,
    pub link_code: String,
    pub occurred_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Request metadata captured alongside a redirect.
///
/// All fields are opaque strings copied from the inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitMetadata {
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl VisitMetadata {
    pub fn new(client_ip: Option<String>, user_agent: Option<&str>, referer: Option<&str>) -> Self {
        Self {
            client_ip,
            user_agent: user_agent.map(str::to_string),
            referer: referer.map(str::to_string),
        }
    }
}

/// A visit waiting to be appended to the store.
///
/// `occurred_at` is taken when the redirect is served, not when the row is
/// written, so queueing delay does not skew timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub link_code: String,
    pub occurred_at: DateTime<Utc>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl NewVisit {
    pub fn new(
        link_code: impl Into<String>,
        occurred_at: DateTime<Utc>,
        metadata: VisitMetadata,
    ) -> Self {
        Self {
            link_code: link_code.into(),
            occurred_at,
            client_ip: metadata.client_ip,
            user_agent: metadata.user_agent,
            referer: metadata.referer,
        }
    }
}
