//! In-memory storage implementation
//!
//! Same contract as the SQLite store, kept in a `BTreeMap` so listing
//! follows id (creation) order.

use crate::job::{AnalysisJob, JobId, JobStatus, PageAnalysis};
use crate::storage::traits::{check_transition, ResultStore, StorageError, StorageResult};
use chrono::Utc;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStore {
    jobs: BTreeMap<JobId, AnalysisJob>,
    next_id: JobId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn job_mut(&mut self, id: JobId) -> StorageResult<&mut AnalysisJob> {
        self.jobs.get_mut(&id).ok_or(StorageError::JobNotFound(id))
    }

    /// Applies a run-driven transition and returns the job for further edits
    fn advance(&mut self, id: JobId, next: JobStatus) -> StorageResult<&mut AnalysisJob> {
        let job = self.job_mut(id)?;
        check_transition(id, job.status, next)?;
        job.status = next;
        job.updated_at = Utc::now().to_rfc3339();
        Ok(job)
    }
}

impl ResultStore for MemoryStore {
    fn create(&mut self, target_url: &str) -> StorageResult<JobId> {
        self.next_id += 1;
        let id = self.next_id;
        let now = Utc::now().to_rfc3339();

        self.jobs.insert(
            id,
            AnalysisJob {
                id,
                target_url: target_url.to_string(),
                status: JobStatus::Queued,
                result: None,
                error_detail: None,
                created_at: now.clone(),
                updated_at: now,
            },
        );
        Ok(id)
    }

    fn set_status(&mut self, id: JobId, status: JobStatus) -> StorageResult<()> {
        self.advance(id, status)?;
        Ok(())
    }

    fn set_result(&mut self, id: JobId, analysis: &PageAnalysis) -> StorageResult<()> {
        let job = self.advance(id, JobStatus::Done)?;
        job.result = Some(analysis.clone());
        job.error_detail = None;
        Ok(())
    }

    fn set_error(&mut self, id: JobId, detail: &str) -> StorageResult<()> {
        let job = self.advance(id, JobStatus::Error)?;
        job.result = None;
        job.error_detail = Some(detail.to_string());
        Ok(())
    }

    fn reset(&mut self, id: JobId) -> StorageResult<()> {
        let job = self.job_mut(id)?;
        job.status = JobStatus::Queued;
        job.result = None;
        job.error_detail = None;
        job.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }

    fn get(&self, id: JobId) -> StorageResult<AnalysisJob> {
        self.jobs
            .get(&id)
            .cloned()
            .ok_or(StorageError::JobNotFound(id))
    }

    fn list_all(&self) -> StorageResult<Vec<AnalysisJob>> {
        Ok(self.jobs.values().cloned().collect())
    }

    fn delete(&mut self, id: JobId) -> StorageResult<()> {
        self.jobs.remove(&id);
        Ok(())
    }
}
