//! Data models
//!
//! Row types mapping the PostgreSQL schema, the enum types used by it, and
//! the aggregate payloads returned by stats endpoints.

pub mod analytics;
pub mod company;
pub mod document;
pub mod employee;
pub mod letter;
pub mod user;
pub mod visitor;
