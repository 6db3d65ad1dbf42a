//! Page analyzer
//!
//! Fetches one page, parses it, extracts metadata and runs the link checker.
//! Only the fetch and the parse can fail; every later step reports absence
//! as zero or empty.

use crate::analysis::document::{Document, ParseError};
use crate::analysis::fetcher::{build_http_client, fetch_page, FetchError};
use crate::analysis::links::{extract_links, LinkChecker, ResolvedLink};
use crate::config::{AnalyzerConfig, Config};
use crate::job::{HeadingCounts, PageAnalysis};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failures that abort a whole analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Something that can analyze a page given its URL
///
/// The orchestrator is generic over this so runs can be driven by test
/// doubles as well as by `PageAnalyzer`.
pub trait Analyze: Send + Sync + 'static {
    fn analyze(&self, url: &str) -> impl Future<Output = Result<PageAnalysis, AnalysisError>> + Send;
}

/// Fetch-parse-extract pipeline for a single page
pub struct PageAnalyzer {
    client: Client,
    fetch_timeout: Duration,
    links: LinkChecker,
}

impl PageAnalyzer {
    pub fn new(client: Client, config: &AnalyzerConfig) -> Self {
        let links = LinkChecker::new(
            client.clone(),
            config.probe_timeout(),
            config.max_concurrent_probes as usize,
        );
        Self {
            client,
            fetch_timeout: config.fetch_timeout(),
            links,
        }
    }

    /// Builds the HTTP client from the user agent section and wires the analyzer
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent)?;
        Ok(Self::new(client, &config.analyzer))
    }

    /// Runs the full analysis of `url`
    pub async fn analyze_page(&self, url: &str) -> Result<PageAnalysis, AnalysisError> {
        let base_url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Fetching {}", url);
        let page = fetch_page(&self.client, url, self.fetch_timeout).await?;
        if page.final_url != url {
            tracing::debug!("{} redirected to {}", url, page.final_url);
        }
        if page.status_code >= 400 {
            tracing::info!(
                "{} answered with HTTP {}, analyzing the error page",
                url,
                page.status_code
            );
        }

        let (mut analysis, links) =
            inspect_document(page.content_type.as_deref(), &page.body, &base_url)?;

        tracing::debug!("Probing {} links found on {}", links.len(), url);
        let report = self.links.check(&links).await;

        analysis.internal_link_count = report.internal;
        analysis.external_link_count = report.external;
        analysis.broken_links = report.broken;

        Ok(analysis)
    }
}

impl Analyze for PageAnalyzer {
    fn analyze(&self, url: &str) -> impl Future<Output = Result<PageAnalysis, AnalysisError>> + Send {
        self.analyze_page(url)
    }
}

/// Parses the body and extracts everything that needs no network access
///
/// Link counts and broken links are left empty for the link checker to fill.
pub fn inspect_document(
    content_type: Option<&str>,
    body: &str,
    base_url: &Url,
) -> Result<(PageAnalysis, Vec<ResolvedLink>), ParseError> {
    let document = Document::from_response(content_type, body)?;

    let mut heading_counts = HeadingCounts::default();
    for level in 1..=6u8 {
        let count = document.count(&format!("h{}", level));
        heading_counts.set(level, count as u32);
    }

    let analysis = PageAnalysis {
        html_version: document.html_version(),
        page_title: document.first_text("title").unwrap_or_default(),
        heading_counts,
        login_form_detected: document.has_password_input(),
        ..Default::default()
    };

    let links = extract_links(&document, base_url);
    Ok((analysis, links))
}
