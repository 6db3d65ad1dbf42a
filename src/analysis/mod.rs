//! Page analysis engine
//!
//! This module contains the analysis pipeline, including:
//! - HTTP fetching of the analyzed page
//! - The parsed document model
//! - Link resolution, classification and concurrent liveness probing
//! - The page analyzer that assembles a `PageAnalysis`

mod analyzer;
mod document;
mod fetcher;
mod links;

pub use analyzer::{inspect_document, Analyze, AnalysisError, PageAnalyzer};
pub use document::{Document, ParseError, UNKNOWN_HTML_VERSION};
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchedPage};
pub use links::{
    classify_link, extract_links, probe_link, resolve_link, LinkChecker, LinkKind, LinkReport,
    ProbeError, ResolvedLink,
};
