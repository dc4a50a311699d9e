//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::error;

use crate::domain::entities::VisitMetadata;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache, then store)
/// 2. Hand a visit to the analytics recorder without waiting for it
/// 3. Return `302 Found`, or `301 Moved Permanently` when configured
///
/// The `Location` header carries the stored target byte-for-byte.
///
/// # Errors
///
/// Plain text bodies: 404 `Not found` for unknown codes, 500 on store failures.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Response {
    let target = match state.resolver.resolve(&code).await {
        Ok(target) => target,
        Err(err) => return plain_error(err),
    };

    let location = match HeaderValue::from_bytes(target.as_bytes()) {
        Ok(location) => location,
        Err(e) => {
            error!(code = %code, error = %e, "stored target is not a valid Location header");
            return plain_error(AppError::internal(
                "Stored target cannot be sent as a Location header",
                serde_json::json!({ "code": code }),
            ));
        }
    };

    let metadata = VisitMetadata::new(
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );
    state.recorder.record(&code, metadata);

    let status = if state.settings.redirect_permanent {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::FOUND
    };

    (status, [(header::LOCATION, location)]).into_response()
}

/// Renders redirect failures as plain text instead of the JSON error body.
fn plain_error(err: AppError) -> Response {
    match err {
        AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found").into_response(),
        err => {
            error!(kind = err.kind(), error = %err, "redirect failed");
            (err.status_code(), "Internal server error").into_response()
        }
    }
}
