//! API route configuration.

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /shorten`      - Create a short link
/// - `GET  /stats/{code}` - Counters and recent visits for a link
/// - `GET  /health`       - Component health
/// - `GET  /{code}`       - Redirect to the target URL
///
/// Static segments take precedence over `/{code}`, and custom slugs may not use
/// the reserved names `health`, `shorten` and `stats`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
