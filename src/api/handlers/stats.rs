//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::json;

use crate::api::dto::stats::{StatsQuery, StatsResponse};
use crate::application::services::stats_service::DEFAULT_RECENT_VISITS;
use crate::error::AppError;
use crate::state::AppState;

/// Returns counters and recent visits for a short code.
///
/// # Endpoint
///
/// `GET /stats/{code}?limit=20`
///
/// `limit` defaults to 20 and is clamped to 1..=100.
///
/// # Response
///
/// ```json
/// {
///   "code": "abc123",
///   "targetUrl": "https://example.com",
///   "clickCount": 2,
///   "visitCount": 2,
///   "createdAt": "2024-01-01T00:00:00Z",
///   "recentVisits": [
///     { "occurredAt": "2024-01-02T10:00:00Z", "clientIp": "10.0.0.1", "userAgent": "curl/8.0" }
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 `invalid_request` if the query string does not parse, 404 if the
/// code is unknown.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<StatsResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::invalid_request(
            "Invalid query string",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_VISITS);

    let stats = state.stats_service.get_stats(&code, limit).await?;

    Ok(Json(StatsResponse::from(stats)))
}
