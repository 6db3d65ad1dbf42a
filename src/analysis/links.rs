//! Link resolution, classification and liveness probing
//!
//! # Link Extraction Rules
//!
//! - Only `<a>` elements with a non-empty `href` are considered
//! - Targets are resolved against the page URL (`Url::join`)
//! - Targets that fail to parse are skipped
//! - Script pseudo-URLs (`javascript:`, `vbscript:`) are ignored entirely
//!
//! A resolved target is internal iff its host and port equal those of the
//! page. Targets without a host (`mailto:`, `tel:`, ...) are external.
//!
//! # Probing
//!
//! Every kept target gets a HEAD request bounded by the probe timeout.
//! Network failures, timeouts, HTTP statuses >= 400 and targets the client
//! cannot request at all (non-HTTP schemes) count as broken.
//! Probes run concurrently under a semaphore; results are slotted by
//! position so the broken list follows document order.

use crate::analysis::document::Document;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Schemes that execute script instead of navigating
const SCRIPT_SCHEMES: &[&str] = &["javascript", "vbscript"];

/// Why a single link probe counts as broken
///
/// Never surfaced as a job failure: the link checker turns it into data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("probe task did not complete")]
    Aborted,
}

/// Where a link points relative to the analyzed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Internal,
    External,
}

/// A hyperlink target resolved to an absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub url: Url,
    pub kind: LinkKind,
}

/// Link statistics for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    pub internal: u32,
    pub external: u32,
    /// Broken targets in document order; repeated anchors appear repeatedly
    pub broken: Vec<String>,
}

/// Resolves an `href` value against the page URL
///
/// Returns None if the link should be excluded:
/// - empty or whitespace-only values
/// - values that fail to parse
/// - script pseudo-URLs
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    if SCRIPT_SCHEMES.contains(&resolved.scheme()) {
        return None;
    }
    Some(resolved)
}

/// Classifies a resolved target by host and port match against the page URL
///
/// Hosts of http(s) URLs are lowercased by the parser, so the comparison is
/// effectively case-insensitive. Default ports compare equal to explicit ones.
pub fn classify_link(target: &Url, base_url: &Url) -> LinkKind {
    let same_host = target.host_str().is_some() && target.host_str() == base_url.host_str();
    if same_host && target.port_or_known_default() == base_url.port_or_known_default() {
        LinkKind::Internal
    } else {
        LinkKind::External
    }
}

/// Extracts, resolves and classifies every anchor target, in document order
pub fn extract_links(document: &Document, base_url: &Url) -> Vec<ResolvedLink> {
    document
        .anchor_targets()
        .into_iter()
        .filter_map(|href| {
            let url = resolve_link(href, base_url);
            if url.is_none() {
                tracing::trace!("Skipping link target {:?}", href);
            }
            url
        })
        .map(|url| {
            let kind = classify_link(&url, base_url);
            ResolvedLink { url, kind }
        })
        .collect()
}

/// Sends a HEAD request and reports the status code of a live link
pub async fn probe_link(client: &Client, url: &str, timeout: Duration) -> Result<u16, ProbeError> {
    let response = client
        .head(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout
            } else if e.is_connect() {
                ProbeError::Connect(e.to_string())
            } else {
                ProbeError::Request(e.to_string())
            }
        })?;

    let status = response.status().as_u16();
    if status >= 400 {
        Err(ProbeError::Status(status))
    } else {
        Ok(status)
    }
}

/// Concurrent link prober
#[derive(Clone)]
pub struct LinkChecker {
    client: Client,
    probe_timeout: Duration,
    max_concurrent: usize,
}

impl LinkChecker {
    pub fn new(client: Client, probe_timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            client,
            probe_timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Counts and probes the links of one page
    ///
    /// Identical targets are probed once; every occurrence is counted and,
    /// when broken, listed at its own position.
    pub async fn check(&self, links: &[ResolvedLink]) -> LinkReport {
        let mut report = LinkReport::default();
        for link in links {
            match link.kind {
                LinkKind::Internal => report.internal += 1,
                LinkKind::External => report.external += 1,
            }
        }

        // Map each occurrence onto a slot of the unique target list
        let mut unique: Vec<String> = Vec::new();
        let mut slot_of: HashMap<String, usize> = HashMap::new();
        let occurrences: Vec<usize> = links
            .iter()
            .map(|link| {
                let url = link.url.as_str();
                *slot_of.entry(url.to_string()).or_insert_with(|| {
                    unique.push(url.to_string());
                    unique.len() - 1
                })
            })
            .collect();

        let outcomes = self.probe_all(&unique).await;

        for (position, slot) in occurrences.into_iter().enumerate() {
            if let Err(reason) = &outcomes[slot] {
                tracing::debug!("Broken link {}: {}", links[position].url, reason);
                report.broken.push(links[position].url.to_string());
            }
        }

        report
    }

    /// Probes each URL and returns outcomes indexed like the input
    async fn probe_all(&self, urls: &[String]) -> Vec<Result<u16, ProbeError>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().enumerate() {
            let client = self.client.clone();
            let semaphore = Arc::clone(&semaphore);
            let url = url.clone();
            let timeout = self.probe_timeout;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => probe_link(&client, &url, timeout).await,
                    Err(_) => Err(ProbeError::Aborted),
                };
                (index, outcome)
            });
        }

        // Slots left unfilled (a probe task died) stay broken
        let mut outcomes: Vec<Result<u16, ProbeError>> =
            vec![Err(ProbeError::Aborted); urls.len()];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = outcome,
                Err(e) => tracing::warn!("Link probe task failed: {}", e),
            }
        }

        outcomes
    }
}
