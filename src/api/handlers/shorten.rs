//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/page", "slug": "my-link" }
/// ```
///
/// `slug` is optional; without it a random code is generated.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "code": "my-link",
///   "shortUrl": "http://localhost:3000/my-link",
///   "targetUrl": "https://example.com/some/page"
/// }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url` / `invalid_slug_format`
/// - 409 `slug_taken`
/// - 500 `generation_exhausted` / `store_unavailable`
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::invalid_url(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    payload.validate()?;

    let link = state
        .link_service
        .shorten(&payload.url, payload.slug.as_deref())
        .await?;

    let response = ShortenResponse::from_link(link, &state.settings.base_url);

    Ok((StatusCode::CREATED, Json(response)))
}
