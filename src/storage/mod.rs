//! Result store for analysis jobs
//!
//! This module handles persistence of jobs and their results, including:
//! - The `ResultStore` trait consumed by the orchestrator
//! - A SQLite-backed implementation
//! - An in-memory implementation for tests and embedding

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{lock_store, ResultStore, SharedStore, StorageError, StorageResult};

use crate::AuditError;
use std::path::Path;

/// Opens (or creates) the SQLite result store at `path`
pub fn open_store(path: &Path) -> Result<SqliteStore, AuditError> {
    SqliteStore::new(path)
}
