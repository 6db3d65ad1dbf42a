//! Result store trait and error types

use crate::job::{AnalysisJob, JobId, JobStatus, PageAnalysis};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid status transition for job {id}: {from} -> {to}")]
    InvalidTransition {
        id: JobId,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("Corrupt record for job {id}: {message}")]
    Corrupt { id: JobId, message: String },

    #[error("Result store lock poisoned")]
    Lock,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence contract for analysis jobs
///
/// Writes that finish a job (`set_result`, `set_error`) update the status
/// and the payload together, so readers never see `done` without a result
/// or a result on a non-`done` job.
pub trait ResultStore: Send {
    /// Creates a job in `queued` state with an empty result
    fn create(&mut self, target_url: &str) -> StorageResult<JobId>;

    /// Moves a job along `queued -> running -> {done, error}`
    fn set_status(&mut self, id: JobId, status: JobStatus) -> StorageResult<()>;

    /// Stores the analysis and marks the job `done`
    fn set_result(&mut self, id: JobId, analysis: &PageAnalysis) -> StorageResult<()>;

    /// Stores the error detail and marks the job `error`
    fn set_error(&mut self, id: JobId, detail: &str) -> StorageResult<()>;

    /// Puts a job back to `queued`, discarding any result or error
    fn reset(&mut self, id: JobId) -> StorageResult<()>;

    fn get(&self, id: JobId) -> StorageResult<AnalysisJob>;

    /// All jobs in creation order
    fn list_all(&self) -> StorageResult<Vec<AnalysisJob>>;

    /// Removes a job; removing an absent job is not an error
    fn delete(&mut self, id: JobId) -> StorageResult<()>;
}

/// Store handle shared between the orchestrator and its runs
pub type SharedStore = Arc<Mutex<dyn ResultStore>>;

/// Locks a shared store, mapping poisoning to `StorageError::Lock`
pub fn lock_store(store: &SharedStore) -> StorageResult<MutexGuard<'_, dyn ResultStore + 'static>> {
    store.lock().map_err(|_| StorageError::Lock)
}

/// Checks a run-driven status change
pub(crate) fn check_transition(id: JobId, from: JobStatus, to: JobStatus) -> StorageResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(StorageError::InvalidTransition { id, from, to })
    }
}
