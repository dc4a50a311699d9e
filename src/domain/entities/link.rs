//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A short code bound to its target URL.
///
/// Everything except `click_count` is fixed at creation. The counter is only
/// advanced by the visit worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        target_url: String,
        created_at: DateTime<Utc>,
        click_count: i64,
    ) -> Self {
        Self {
            code,
            target_url,
            created_at,
            click_count,
        }
    }
}

/// Input data for creating a new link.
///
/// The store assigns `created_at` and starts `click_count` at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
}

impl NewLink {
    pub fn new(code: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            target_url: target_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            "abc123".to_string(),
            "https://example.com".to_string(),
            now,
            0,
        );

        assert_eq!(link.code, "abc123");
        assert_eq!(link.target_url, "https://example.com");
        assert_eq!(link.created_at, now);
        assert_eq!(link.click_count, 0);
    }

    #[test]
    fn test_new_link_creation() {
        let new_link = NewLink::new("xyz789", "https://rust-lang.org");

        assert_eq!(new_link.code, "xyz789");
        assert_eq!(new_link.target_url, "https://rust-lang.org");
    }
}
