//! Configuration module for Page-Audit
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file (or no file at all) is a valid setup.
//!
//! # Example
//!
//! ```no_run
//! use page_audit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("page-audit.toml")).unwrap();
//! println!("Probe timeout: {}s", config.analyzer.probe_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalyzerConfig, Config, StorageConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default};
pub use validation::validate;
