//! Page-Audit: asynchronous web page analysis
//!
//! This crate accepts URLs, analyzes each page in the background (title,
//! heading tally, internal/external link counts, broken-link detection,
//! login-form detection) and keeps the results in a result store that can
//! be queried, re-analyzed and pruned.

pub mod analysis;
pub mod config;
pub mod job;
pub mod orchestrator;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Page-Audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Job not found: {0}")]
    NotFound(job::JobId),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<storage::StorageError> for AuditError {
    fn from(err: storage::StorageError) -> Self {
        match err {
            storage::StorageError::JobNotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Page-Audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analysis::{AnalysisError, PageAnalyzer};
pub use config::Config;
pub use job::{AnalysisJob, JobId, JobStatus, PageAnalysis};
pub use orchestrator::Orchestrator;
pub use storage::{MemoryStore, ResultStore, SqliteStore};
