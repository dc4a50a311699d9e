//! Repository trait definitions for the domain layer.
//!
//! Traits define the data access contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link store and visit log
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod link_repository;

pub use link_repository::{LinkRepository, StoreError, StoreResult};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
