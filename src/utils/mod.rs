//! Shared utilities
//!
//! Error handling, request validation and JWT helpers.

pub mod errors;
pub mod jwt;
pub mod validation;
