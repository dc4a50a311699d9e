//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: Round-trip query against the link store
/// 2. **Visit Queue**: Channel is open; reports free capacity
/// 3. **Cache**: Redis PING, or "disabled" when no cache is configured
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let visit_queue = check_visit_queue(&state);
    let cache = check_cache(&state).await;

    let all_healthy = database.is_ok() && visit_queue.is_ok() && cache.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            visit_queue,
            cache,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.repository.ping().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

fn check_visit_queue(state: &AppState) -> CheckStatus {
    if state.recorder.is_closed() {
        CheckStatus::error("Visit queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.recorder.capacity()))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if !state.cache.is_enabled() {
        return CheckStatus::ok("Disabled");
    }

    if state.cache.health_check().await {
        CheckStatus::ok("Redis connected")
    } else {
        CheckStatus::error("Redis connection failed")
    }
}
