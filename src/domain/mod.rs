//! Domain layer containing business entities and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_worker`] - Asynchronous visit recording
//!
//! # Visit Processing Flow
//!
//! 1. The redirect handler resolves a code and answers immediately
//! 2. [`visit_worker::AnalyticsRecorder::record`] enqueues a [`entities::NewVisit`]
//! 3. [`visit_worker::run_visit_worker`] appends the visit row and bumps the counter
//! 4. Write failures are logged and counted, never surfaced to the client

pub mod entities;
pub mod repositories;
pub mod visit_worker;
