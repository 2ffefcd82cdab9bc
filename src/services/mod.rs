//! Services module
//!
//! Domain logic that does not depend on HTTP: code generation, letter
//! rendering, aggregations, password hashing and file storage.

pub mod employee_code;
pub mod letter_renderer;
pub mod password;
pub mod stats;
pub mod storage;

pub use storage::{FileStorage, LocalFileStorage, MemoryFileStorage};
