//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to shorten a single URL.
///
/// Only the length (at most 2048 characters) is checked here; the URL itself is validated by
/// [`crate::application::services::LinkService::shorten`].
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,

    /// Optional custom short code.
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
}

impl ShortenResponse {
    pub fn from_link(link: Link, base_url: &str) -> Self {
        Self {
            short_url: short_url(base_url, &link.code),
            code: link.code,
            target_url: link.target_url,
        }
    }
}

/// Joins the public base URL and a code with exactly one slash.
pub fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_trims_trailing_slash() {
        assert_eq!(short_url("https://sho.rt/", "abc"), "https://sho.rt/abc");
        assert_eq!(short_url("https://sho.rt", "abc"), "https://sho.rt/abc");
    }

    #[test]
    fn test_request_length_validation() {
        let request = ShortenRequest {
            url: format!("https://example.com/{}", "a".repeat(2048)),
            slug: None,
        };
        assert!(request.validate().is_err());

        let request = ShortenRequest {
            url: "https://example.com".to_string(),
            slug: None,
        };
        assert!(request.validate().is_ok());
    }
}
