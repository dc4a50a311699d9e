//! Syntactic validation of target URLs.
//!
//! Targets are checked but never rewritten: the stored URL is exactly the string
//! the caller submitted, so a redirect reproduces it byte-for-byte.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL must not contain whitespace or control characters")]
    IllegalCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http` or `https` URL with a host.
///
/// Rejects potentially dangerous schemes like `javascript:`, `data:` or `file:`.
/// Whitespace and control characters are rejected outright instead of being
/// trimmed or percent-encoded, since the input is stored verbatim.
///
/// # Errors
///
/// Returns the matching [`UrlValidationError`] variant.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_target_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_target_url("not-a-url").is_err());
/// assert!(validate_target_url("ftp://example.com/file").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if input.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(UrlValidationError::IllegalCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
