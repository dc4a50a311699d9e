//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait and
//! provide the operations used by HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation
//! - [`services::resolver::Resolver`] - Code to target lookups
//! - [`services::stats_service::StatsService`] - Click counters and visit history

pub mod services;
