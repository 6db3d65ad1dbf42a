//! Analysis job orchestration
//!
//! The orchestrator owns the lifecycle of every job:
//! - Validating and recording submitted URLs
//! - Running each analysis as a tracked background task
//! - Cancel-then-restart on re-analysis, so a job never has two runs
//! - Converting failures and panics into `error` records
//! - Draining in-flight runs before shutdown

mod coordinator;

pub use coordinator::{validate_target_url, Orchestrator};
