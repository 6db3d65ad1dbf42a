//! Job data model
//!
//! - `JobStatus`: lifecycle of one analysis job (queued, running, done, error)
//! - `AnalysisJob`: the stored record for one submitted URL
//! - `PageAnalysis` / `HeadingCounts`: the output of one successful analysis

mod analysis;
mod status;

pub use analysis::{HeadingCounts, PageAnalysis};
pub use status::JobStatus;

/// Identifier assigned to a job by the result store
pub type JobId = i64;

/// One submitted-URL analysis lifecycle instance
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
    pub id: JobId,
    pub target_url: String,
    pub status: JobStatus,
    /// Present iff `status` is `Done`
    pub result: Option<PageAnalysis>,
    /// Present iff `status` is `Error`
    pub error_detail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl AnalysisJob {
    /// Returns true once the job reached `done` or `error`
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}
