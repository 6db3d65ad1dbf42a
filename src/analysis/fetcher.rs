//! HTTP fetcher implementation
//!
//! This module handles the page fetch for an analysis run:
//! - Building the shared HTTP client with a descriptive user agent
//! - GET requests bounded by the configured fetch timeout
//! - Transport error classification

use crate::config::UserAgentConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Transport failures reaching the analyzed page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid target URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

/// A page retrieved for analysis
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,
    /// Decoded page body
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// Per-request timeouts are applied by the callers: the page fetch and the
/// link probes carry independent bounds.
///
/// # Example
///
/// ```no_run
/// use page_audit::analysis::build_http_client;
/// use page_audit::config::UserAgentConfig;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page for analysis
///
/// Any HTTP response counts as a successful fetch, including 4xx/5xx: the
/// returned body is what gets analyzed. Only transport-level failures are
/// errors.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_fetch_error(url, &e))?;

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    Ok(FetchedPage {
        final_url,
        status_code,
        content_type,
        body,
    })
}

fn classify_fetch_error(url: &str, e: &reqwest::Error) -> FetchError {
    let url = url.to_string();
    if e.is_timeout() {
        FetchError::Timeout { url }
    } else if e.is_connect() {
        FetchError::Connect {
            url,
            message: e.to_string(),
        }
    } else if e.is_builder() {
        FetchError::InvalidUrl {
            url,
            message: e.to_string(),
        }
    } else {
        FetchError::Request {
            url,
            message: e.to_string(),
        }
    }
}
