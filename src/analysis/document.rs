//! Parsed HTML document
//!
//! Wraps `scraper::Html` and exposes the queries the analyzer needs:
//! element counts, first-element text, anchor targets, password inputs and
//! the DOCTYPE-derived HTML version.

use scraper::{Html, Selector};
use thiserror::Error;

/// Label used when the DOCTYPE is missing or not recognised
pub const UNKNOWN_HTML_VERSION: &str = "Unknown";

/// Public identifier fragments, most specific first
const DOCTYPE_VERSIONS: &[(&str, &str)] = &[
    ("XHTML 1.1", "XHTML 1.1"),
    ("XHTML 1.0 STRICT", "XHTML 1.0 Strict"),
    ("XHTML 1.0 TRANSITIONAL", "XHTML 1.0 Transitional"),
    ("XHTML 1.0 FRAMESET", "XHTML 1.0 Frameset"),
    ("HTML 4.01 TRANSITIONAL", "HTML 4.01 Transitional"),
    ("HTML 4.01 FRAMESET", "HTML 4.01 Frameset"),
    ("HTML 4.01", "HTML 4.01 Strict"),
    ("HTML 4.0 TRANSITIONAL", "HTML 4.0 Transitional"),
    ("HTML 4.0 FRAMESET", "HTML 4.0 Frameset"),
    ("HTML 4.0", "HTML 4.0 Strict"),
    ("HTML 3.2", "HTML 3.2"),
    ("HTML 2.0", "HTML 2.0"),
];

/// Page content that cannot be analyzed as HTML
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected an HTML document, got content type '{content_type}'")]
    NotHtml { content_type: String },
}

/// An in-memory parsed page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup; HTML parsing itself is error-tolerant and never fails
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Parses a fetched body after checking its declared content type
    ///
    /// A missing Content-Type is treated as HTML.
    pub fn from_response(content_type: Option<&str>, body: &str) -> Result<Self, ParseError> {
        if let Some(content_type) = content_type {
            if !is_html_content_type(content_type) {
                return Err(ParseError::NotHtml {
                    content_type: content_type.to_string(),
                });
            }
        }
        Ok(Self::parse(body))
    }

    /// Whitespace-trimmed text of the first element matching `selector`
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
    }

    /// Number of elements matching `selector` anywhere in the document
    pub fn count(&self, selector: &str) -> usize {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).count(),
            Err(_) => 0,
        }
    }

    /// Non-empty `href` values of `<a>` elements, in document order
    pub fn anchor_targets(&self) -> Vec<&str> {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .collect()
    }

    /// True iff any `<input type="password">` exists (type compared case-insensitively)
    pub fn has_password_input(&self) -> bool {
        let Ok(selector) = Selector::parse("input[type]") else {
            return false;
        };

        self.html.select(&selector).any(|element| {
            element
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("password"))
        })
    }

    /// HTML version label derived from the DOCTYPE
    pub fn html_version(&self) -> String {
        let doctype = self
            .html
            .tree
            .root()
            .children()
            .find_map(|node| node.value().as_doctype());

        let Some(doctype) = doctype else {
            return UNKNOWN_HTML_VERSION.to_string();
        };

        if !doctype.name().eq_ignore_ascii_case("html") {
            return UNKNOWN_HTML_VERSION.to_string();
        }

        let public_id = doctype.public_id().trim().to_ascii_uppercase();
        if public_id.is_empty() {
            return "HTML5".to_string();
        }

        DOCTYPE_VERSIONS
            .iter()
            .find(|(needle, _)| public_id.contains(needle))
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| UNKNOWN_HTML_VERSION.to_string())
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime.is_empty() || mime == "text/html" || mime == "application/xhtml+xml"
}
