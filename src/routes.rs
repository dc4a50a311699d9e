//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`      - Create a short link
//! - `GET  /stats/{code}` - Link statistics
//! - `GET  /health`       - Health check: DB, cache, visit queue
//! - `GET  /{code}`       - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = api::routes::api_routes()
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
