//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure a caller can observe is one of the [`AppError`] variants.
//! Lower layers use their own typed errors ([`StoreError`],
//! [`SlugValidationError`]) which convert into `AppError` at the service boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;
use crate::utils::code_generator::SlugValidationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned in JSON payloads.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidRequest { message: String, details: Value },

    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    #[error("{message}")]
    InvalidSlugFormat { message: String, details: Value },

    #[error("{message}")]
    SlugTaken { message: String, details: Value },

    #[error("{message}")]
    GenerationExhausted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_slug(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidSlugFormat {
            message: message.into(),
            details,
        }
    }

    pub fn slug_taken(message: impl Into<String>, details: Value) -> Self {
        Self::SlugTaken {
            message: message.into(),
            details,
        }
    }

    pub fn generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::GenerationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns the stable machine-readable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidSlugFormat { .. } => "invalid_slug_format",
            Self::SlugTaken { .. } => "slug_taken",
            Self::GenerationExhausted { .. } => "generation_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// HTTP status code used when this error is returned from a JSON endpoint.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } | Self::InvalidUrl { .. } | Self::InvalidSlugFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::SlugTaken { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::GenerationExhausted { .. }
            | Self::StoreUnavailable { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::InvalidRequest { message, details }
            | Self::InvalidUrl { message, details }
            | Self::InvalidSlugFormat { message, details }
            | Self::SlugTaken { message, details }
            | Self::GenerationExhausted { message, details }
            | Self::NotFound { message, details }
            | Self::StoreUnavailable { message, details }
            | Self::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.kind(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::StoreUnavailable { .. } | Self::Internal { .. } | Self::GenerationExhausted { .. }
        ) {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { code } => {
                AppError::slug_taken("Short code already exists", json!({ "code": code }))
            }
            StoreError::NotFound { code } => {
                AppError::not_found("Short link not found", json!({ "code": code }))
            }
            StoreError::Unavailable(source) => AppError::store_unavailable(
                "Link store is unavailable",
                json!({ "reason": source.to_string() }),
            ),
        }
    }
}

impl From<SlugValidationError> for AppError {
    fn from(err: SlugValidationError) -> Self {
        let details = match &err {
            SlugValidationError::TooLong { max, actual } => {
                json!({ "max_length": max, "provided_length": actual })
            }
            SlugValidationError::InvalidCharacters { slug }
            | SlugValidationError::Reserved { slug } => json!({ "slug": slug }),
            SlugValidationError::EmptyInput => json!({}),
        };

        AppError::invalid_slug(err.to_string(), details)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        AppError::invalid_url(
            "Request validation failed",
            json!({ "fields": fields, "reason": errors.to_string() }),
        )
    }
}
