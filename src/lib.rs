//! # snaplink
//!
//! A URL shortener built with Axum and SQLx.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the link store trait and the visit worker
//! - **Application Layer** ([`application`]) - Creation, resolution and statistics services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite/PostgreSQL stores and the Redis cache
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random or custom short codes, unique by a single atomic insert
//! - Redirects that never wait on analytics writes
//! - Per-link click counter plus a visit log
//! - Optional Redis cache for redirects
//!
//! ## Quick Start
//!
//! ```bash
//! # SQLite is used by default; migrations run at startup
//! export DATABASE_URL="sqlite://snaplink.db?mode=rwc"
//! export REDIS_URL="redis://localhost:6379"  # Optional
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkStats, Resolver, StatsService};
    pub use crate::domain::entities::{Link, NewLink, NewVisit, Visit, VisitMetadata};
    pub use crate::domain::repositories::{LinkRepository, StoreError};
    pub use crate::domain::visit_worker::AnalyticsRecorder;
    pub use crate::error::AppError;
    pub use crate::state::{AppSettings, AppState};
}
