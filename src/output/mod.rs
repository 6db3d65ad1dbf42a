//! Output module for presenting analysis jobs
//!
//! This module handles:
//! - Rendering single job records and job listings for the terminal
//! - Computing and printing aggregate job statistics

mod report;
pub mod stats;

pub use report::{format_job, format_job_list, print_job, print_job_list};
pub use stats::{load_statistics, print_statistics, JobStatistics};
