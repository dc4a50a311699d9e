//! Short code generation and custom slug validation.
//!
//! Random codes are drawn from the URL-safe base64 alphabet, which is a subset of
//! the characters accepted for custom slugs. Uniqueness is never assumed here; the
//! link store decides whether a candidate is free.

use base64::Engine as _;
use rand::RngCore;
use regex::Regex;
use std::sync::LazyLock;

/// Default length of generated codes (48 bits of entropy).
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Upper bound for user-supplied slugs.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Slugs that would shadow a routed path segment.
pub const RESERVED_SLUGS: &[&str] = &["health", "shorten", "stats"];

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug pattern is valid"));

/// Reasons a custom slug is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    #[error("Custom slug must not be empty")]
    EmptyInput,

    #[error("Custom slug must be at most {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Custom slug may only contain letters, digits, '-' and '_'")]
    InvalidCharacters { slug: String },

    #[error("Custom slug `{slug}` is reserved")]
    Reserved { slug: String },
}

/// Source of candidate short codes.
///
/// Candidates may collide with existing codes; callers must insert them through
/// the store's atomic insert and retry on conflict.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a new candidate code.
    fn generate(&self) -> String;
}

/// Generates fixed-length codes from the thread-local CSPRNG.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// A length of zero is raised to one.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    /// Encodes random bytes as URL-safe base64 without padding and cuts the result
    /// to the configured length.
    fn generate(&self) -> String {
        // Each base64 character carries 6 bits.
        let mut buffer = vec![0u8; (self.length * 3).div_ceil(4)];
        rand::rng().fill_bytes(&mut buffer);

        let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buffer);
        code.truncate(self.length);
        code
    }
}

/// Validates a caller-supplied slug and returns it as the code to store.
///
/// # Rules
///
/// - Not empty
/// - At most [`MAX_SLUG_LENGTH`] characters
/// - Only ASCII letters, digits, `-` and `_`
/// - Not one of [`RESERVED_SLUGS`]
///
/// # Errors
///
/// Returns the first [`SlugValidationError`] that applies, in the order above.
pub fn validate_custom_slug(candidate: &str) -> Result<String, SlugValidationError> {
    if candidate.is_empty() {
        return Err(SlugValidationError::EmptyInput);
    }

    let length = candidate.chars().count();
    if length > MAX_SLUG_LENGTH {
        return Err(SlugValidationError::TooLong {
            max: MAX_SLUG_LENGTH,
            actual: length,
        });
    }

    if !SLUG_REGEX.is_match(candidate) {
        return Err(SlugValidationError::InvalidCharacters {
            slug: candidate.to_string(),
        });
    }

    if RESERVED_SLUGS.contains(&candidate) {
        return Err(SlugValidationError::Reserved {
            slug: candidate.to_string(),
        });
    }

    Ok(candidate.to_string())
}
