//! Link creation service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, RESERVED_SLUGS, validate_custom_slug};
use crate::utils::url_validator::validate_target_url;

/// Default number of insert attempts for generated codes.
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: usize = 5;

/// Service implementing the `shorten` operation.
///
/// Composes a [`CodeGenerator`] with the store's atomic insert. Uniqueness is
/// decided solely by [`LinkRepository::insert_if_absent`]; this service never
/// checks for existence before inserting.
pub struct LinkService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    ///
    /// `max_attempts` bounds the number of inserts tried for generated codes and
    /// is raised to at least one.
    pub fn new(repository: Arc<R>, generator: Arc<dyn CodeGenerator>, max_attempts: usize) -> Self {
        Self {
            repository,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a short link for `target_url`.
    ///
    /// # Arguments
    ///
    /// - `target_url` - The URL to redirect to; stored exactly as given
    /// - `custom_slug` - Optional caller-chosen code
    ///
    /// # Flow
    ///
    /// 1. Validate the target URL
    /// 2. With a slug: validate it, insert once, report a conflict as taken
    /// 3. Without a slug: insert generated candidates until one is accepted or the
    ///    attempt budget is spent
    ///
    /// The store is not touched when validation fails.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidUrl`] if the URL is malformed or not HTTP(S)
    /// - [`AppError::InvalidSlugFormat`] if the slug violates the slug policy
    /// - [`AppError::SlugTaken`] if the slug already exists
    /// - [`AppError::GenerationExhausted`] if every generated candidate collided
    /// - [`AppError::StoreUnavailable`] on storage failures
    pub async fn shorten(
        &self,
        target_url: &str,
        custom_slug: Option<&str>,
    ) -> Result<Link, AppError> {
        validate_target_url(target_url).map_err(|e| {
            AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        match custom_slug {
            Some(slug) => self.insert_custom(target_url, slug).await,
            None => self.insert_generated(target_url).await,
        }
    }

    /// Inserts a caller-chosen slug exactly once.
    async fn insert_custom(&self, target_url: &str, slug: &str) -> Result<Link, AppError> {
        let code = validate_custom_slug(slug)?;

        match self
            .repository
            .insert_if_absent(NewLink::new(code, target_url))
            .await
        {
            Ok(link) => {
                info!(code = %link.code, "created link with custom slug");
                Ok(link)
            }
            Err(StoreError::Conflict { code }) => Err(AppError::slug_taken(
                "Custom slug is already taken",
                json!({ "slug": code }),
            )),
            Err(err) => Err(err.into()),
        }
    }

    /// Inserts generated candidates with a counted retry budget.
    ///
    /// Every pass through the loop is one attempt; a conflict moves to the next
    /// attempt with a fresh candidate, any other store error ends the loop.
    async fn insert_generated(&self, target_url: &str) -> Result<Link, AppError> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if RESERVED_SLUGS.contains(&candidate.as_str()) {
                debug!(attempt, code = %candidate, "generated a reserved code, retrying");
                continue;
            }

            match self
                .repository
                .insert_if_absent(NewLink::new(candidate, target_url))
                .await
            {
                Ok(link) => {
                    info!(code = %link.code, attempt, "created link");
                    return Ok(link);
                }
                Err(StoreError::Conflict { code }) => {
                    debug!(attempt, code = %code, "generated code collided, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "exhausted attempts to generate a unique code"
        );

        Err(AppError::generation_exhausted(
            "Failed to generate a unique short code",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}
