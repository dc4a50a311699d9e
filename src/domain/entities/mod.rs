//! Core domain entities.
//!
//! - [`Link`] - A short code bound to a target URL
//! - [`Visit`] - A recorded resolution of a link
//!
//! Creation inputs live in separate structs (`NewLink`, `NewVisit`).

pub mod link;
pub mod visit;

pub use link::{Link, NewLink};
pub use visit::{NewVisit, Visit, VisitMetadata};
