//! Statistics over all recorded jobs
//!
//! This module provides functionality for aggregating job records from the
//! result store and displaying the totals.

use crate::job::{AnalysisJob, JobStatus};
use crate::storage::{ResultStore, StorageResult};
use std::collections::HashMap;

/// Aggregate job statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStatistics {
    /// Total number of jobs
    pub total: u64,

    /// Count of jobs by status
    pub by_status: HashMap<JobStatus, u64>,

    /// Broken links summed over all `done` jobs
    pub total_broken_links: u64,

    /// Number of analyzed pages carrying a login form
    pub login_forms: u64,
}

impl JobStatistics {
    pub fn compute(jobs: &[AnalysisJob]) -> Self {
        let mut stats = Self {
            total: jobs.len() as u64,
            ..Self::default()
        };

        for job in jobs {
            *stats.by_status.entry(job.status).or_insert(0) += 1;

            if let Some(analysis) = &job.result {
                stats.total_broken_links += analysis.broken_links.len() as u64;
                if analysis.login_form_detected {
                    stats.login_forms += 1;
                }
            }
        }

        stats
    }

    pub fn count(&self, status: JobStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Loads every job from the store and aggregates it
pub fn load_statistics(store: &dyn ResultStore) -> StorageResult<JobStatistics> {
    let jobs = store.list_all()?;
    Ok(JobStatistics::compute(&jobs))
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &JobStatistics) {
    println!("=== Job Statistics ===\n");

    println!("Overview:");
    println!("  Total jobs: {}", stats.total);
    println!("  Broken links found: {}", stats.total_broken_links);
    println!("  Pages with login forms: {}", stats.login_forms);
    println!();

    println!("Jobs by Status:");
    for status in JobStatus::all() {
        let count = stats.count(status);
        let percentage = if stats.total > 0 {
            (count as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", status, count, percentage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::PageAnalysis;
    use crate::storage::MemoryStore;

    #[test]
    fn test_statistics_over_store() {
        let mut store = MemoryStore::new();

        let done = store.create("https://a.example/").unwrap();
        store.set_status(done, JobStatus::Running).unwrap();
        store
            .set_result(
                done,
                &PageAnalysis {
                    broken_links: vec!["https://x/".to_string(), "https://y/".to_string()],
                    login_form_detected: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let failed = store.create("https://b.example/").unwrap();
        store.set_status(failed, JobStatus::Running).unwrap();
        store.set_error(failed, "Fetch error").unwrap();

        store.create("https://c.example/").unwrap();

        let stats = load_statistics(&store).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(JobStatus::Done), 1);
        assert_eq!(stats.count(JobStatus::Error), 1);
        assert_eq!(stats.count(JobStatus::Queued), 1);
        assert_eq!(stats.count(JobStatus::Running), 0);
        assert_eq!(stats.total_broken_links, 2);
        assert_eq!(stats.login_forms, 1);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = JobStatistics::compute(&[]);
        assert_eq!(stats, JobStatistics::default());
    }
}
