//! Database
//!
//! PostgreSQL connection handling.

pub mod connection;

pub use connection::DatabaseConnection;
