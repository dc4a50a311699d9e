//! Utility functions used across the application.
//!
//! - [`code_generator`] - Short code generation and slug validation
//! - [`url_validator`] - Target URL validation

pub mod code_generator;
pub mod url_validator;
