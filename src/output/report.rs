//! Human-readable job records

use crate::job::{AnalysisJob, JobStatus};

/// Formats one job with its full analysis or error detail
pub fn format_job(job: &AnalysisJob) -> String {
    let mut out = String::new();

    out.push_str(&format!("Job {}: {}\n", job.id, job.target_url));
    out.push_str(&format!("  Status: {}\n", job.status));
    out.push_str(&format!("  Created: {}\n", job.created_at));
    out.push_str(&format!("  Updated: {}\n", job.updated_at));

    if let Some(detail) = &job.error_detail {
        out.push_str(&format!("  Error: {}\n", detail));
    }

    if let Some(analysis) = &job.result {
        out.push_str(&format!("  HTML version: {}\n", analysis.html_version));
        out.push_str(&format!("  Title: {}\n", analysis.page_title));
        out.push_str(&format!("  Headings: {}\n", analysis.heading_counts));
        out.push_str(&format!(
            "  Links: {} internal, {} external\n",
            analysis.internal_link_count, analysis.external_link_count
        ));
        out.push_str(&format!(
            "  Login form: {}\n",
            if analysis.login_form_detected { "yes" } else { "no" }
        ));

        if analysis.broken_links.is_empty() {
            out.push_str("  Broken links: none\n");
        } else {
            out.push_str(&format!("  Broken links ({}):\n", analysis.broken_links.len()));
            for link in &analysis.broken_links {
                out.push_str(&format!("    - {}\n", link));
            }
        }
    }

    out
}

/// Formats one line per job: id, status, URL and a short outcome
pub fn format_job_list(jobs: &[AnalysisJob]) -> String {
    if jobs.is_empty() {
        return "No jobs recorded\n".to_string();
    }

    let mut out = String::new();
    for job in jobs {
        let outcome = match (&job.status, &job.result, &job.error_detail) {
            _ if !job.is_finished() => "in progress".to_string(),
            (JobStatus::Done, Some(analysis), _) => {
                format!("{} broken", analysis.broken_links.len())
            }
            (JobStatus::Error, _, Some(detail)) => detail.clone(),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{:>6}  {:<8} {}  {}\n",
            job.id,
            job.status.to_string(),
            job.target_url,
            outcome
        ));
    }
    out
}

pub fn print_job(job: &AnalysisJob) {
    print!("{}", format_job(job));
}

pub fn print_job_list(jobs: &[AnalysisJob]) {
    print!("{}", format_job_list(jobs));
}
