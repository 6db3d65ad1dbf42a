//! Job coordinator - background run management

use crate::analysis::{Analyze, PageAnalyzer};
use crate::config::Config;
use crate::job::{AnalysisJob, JobId, JobStatus};
use crate::storage::{lock_store, SharedStore};
use crate::{AuditError, Result};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// Schedules and tracks analysis runs against an injected result store
pub struct Orchestrator<A: Analyze = PageAnalyzer> {
    store: SharedStore,
    analyzer: Arc<A>,
    /// Latest run per job; held across cancel-and-restart sequences
    runs: Mutex<HashMap<JobId, JoinHandle<()>>>,
}

impl Orchestrator<PageAnalyzer> {
    /// Builds a `PageAnalyzer` from the configuration
    pub fn from_config(config: &Config, store: SharedStore) -> Result<Self> {
        let analyzer = PageAnalyzer::from_config(config)?;
        Ok(Self::new(store, analyzer))
    }
}

impl<A: Analyze> Orchestrator<A> {
    pub fn new(store: SharedStore, analyzer: A) -> Self {
        Self {
            store,
            analyzer: Arc::new(analyzer),
            runs: Mutex::new(HashMap::new()),
        }
    }

    /// Records a new job and starts its analysis in the background
    ///
    /// Returns the freshly created record (status `queued`) without waiting
    /// for the run.
    pub async fn submit(&self, target_url: &str) -> Result<AnalysisJob> {
        let url = validate_target_url(target_url)?;

        let mut runs = self.runs.lock().await;
        let job = {
            let mut store = lock_store(&self.store)?;
            let id = store.create(url.as_str())?;
            store.get(id)?
        };

        tracing::info!("Submitted job {} for {}", job.id, job.target_url);
        runs.retain(|_, handle| !handle.is_finished());
        runs.insert(job.id, self.spawn_run(job.id, job.target_url.clone()));

        Ok(job)
    }

    /// Discards the job's result and analyzes its URL again
    ///
    /// An unfinished previous run is aborted and awaited before the record
    /// is reset, so it can no longer write to the job.
    pub async fn reanalyze(&self, id: JobId) -> Result<AnalysisJob> {
        let mut runs = self.runs.lock().await;
        let target_url = lock_store(&self.store)?.get(id)?.target_url;

        if let Some(previous) = runs.remove(&id) {
            if !previous.is_finished() {
                tracing::info!("Cancelling in-flight run of job {}", id);
                previous.abort();
            }
            if let Err(e) = previous.await {
                if !e.is_cancelled() {
                    tracing::warn!("Previous run of job {} ended abnormally: {}", id, e);
                }
            }
        }

        let job = {
            let mut store = lock_store(&self.store)?;
            store.reset(id)?;
            store.get(id)?
        };

        tracing::info!("Re-analyzing job {} ({})", id, target_url);
        runs.insert(id, self.spawn_run(id, target_url));

        Ok(job)
    }

    pub fn get(&self, id: JobId) -> Result<AnalysisJob> {
        Ok(lock_store(&self.store)?.get(id)?)
    }

    pub fn list(&self) -> Result<Vec<AnalysisJob>> {
        Ok(lock_store(&self.store)?.list_all()?)
    }

    /// Cancels any run of the job and removes it; absent jobs are fine
    pub async fn delete(&self, id: JobId) -> Result<()> {
        let mut runs = self.runs.lock().await;
        if let Some(run) = runs.remove(&id) {
            run.abort();
            let _ = run.await;
        }

        lock_store(&self.store)?.delete(id)?;
        tracing::info!("Deleted job {}", id);
        Ok(())
    }

    /// Number of runs that have not finished yet
    pub async fn in_flight(&self) -> usize {
        let runs = self.runs.lock().await;
        runs.values().filter(|handle| !handle.is_finished()).count()
    }

    /// Waits for every tracked run to finish
    pub async fn drain(&self) {
        let mut runs = self.runs.lock().await;
        for (id, run) in runs.drain() {
            if let Err(e) = run.await {
                tracing::warn!("Run of job {} ended abnormally: {}", id, e);
            }
        }
    }

    fn spawn_run(&self, id: JobId, target_url: String) -> JoinHandle<()> {
        tokio::spawn(execute_run(
            Arc::clone(&self.store),
            Arc::clone(&self.analyzer),
            id,
            target_url,
        ))
    }
}

/// Checks a submitted URL: present, parseable, http(s), with a host
pub fn validate_target_url(raw: &str) -> Result<Url> {
    let invalid = |reason: &str| AuditError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL is required"));
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("only http and https URLs can be analyzed"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(url)
}

/// One analysis run: `running`, analyze, then `done` or `error`
///
/// A result the store refuses is replaced by an error record, so a run that
/// got past `running` always ends in a terminal status.
async fn execute_run<A: Analyze>(
    store: SharedStore,
    analyzer: Arc<A>,
    id: JobId,
    target_url: String,
) {
    if let Err(e) = lock_store(&store).and_then(|mut s| s.set_status(id, JobStatus::Running)) {
        tracing::warn!("Job {} could not start: {}", id, e);
        return;
    }

    tracing::info!("Analyzing job {}: {}", id, target_url);
    let outcome = AssertUnwindSafe(analyzer.analyze(&target_url))
        .catch_unwind()
        .await;

    let recorded = lock_store(&store).and_then(|mut store| match outcome {
        Ok(Ok(analysis)) => {
            tracing::info!(
                "Job {} done: {} internal, {} external, {} broken",
                id,
                analysis.internal_link_count,
                analysis.external_link_count,
                analysis.broken_links.len()
            );
            store.set_result(id, &analysis).or_else(|e| {
                tracing::warn!("Job {} result could not be stored: {}", id, e);
                store.set_error(id, &format!("Failed to store result: {}", e))
            })
        }
        Ok(Err(e)) => {
            tracing::warn!("Job {} failed: {}", id, e);
            store.set_error(id, &e.to_string())
        }
        Err(panic) => {
            let detail = format!("Analysis aborted unexpectedly: {}", panic_message(&*panic));
            tracing::error!("Job {} panicked: {}", id, detail);
            store.set_error(id, &detail)
        }
    });

    if let Err(e) = recorded {
        tracing::error!("Failed to record outcome of job {}: {}", id, e);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
