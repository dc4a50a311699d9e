//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Redirect cache (Redis and no-op implementations)
//! - [`persistence`] - SQLite and PostgreSQL link stores

pub mod cache;
pub mod persistence;
