//! HackerRank profile adapter
//!
//! Public profile page at `https://www.hackerrank.com/{username}`. The page
//! has no stable markup for scores, so score fields come from a label scan;
//! badges and certificates come from known container classes.
//!
//! Precedence is fixed and deterministic. For each label the innermost
//! scanned element containing it is used, and its own text is read before
//! its parent's. The first match in document order wins.

use crate::client::Document;
use crate::error::ProfileError;
use crate::extract::{
    absolutize, collapse_whitespace, dedupe_preserving_order, document_text, element_text,
    first_positive, parent_text, selector, FallbackChain,
};
use crate::platforms::{profile_url, Platform};
use crate::types::{FetchRequest, ProfileRecord};
use async_trait::async_trait;
use scraper::{ElementRef, Html};

const DEFAULT_BASE_URL: &str = "https://www.hackerrank.com";

const BADGE_SELECTOR: &str =
    ".hacker-badges-v2 .hacker-badge, .badges-list .hacker-badge, .badges-wrap .hacker-badge";
const CERTIFICATE_LINK_SELECTOR: &str =
    ".hacker-certificates a.certificate-link, .certificates a, a.certificate-link";

/// Longest raw-text badge label accepted, in characters
const MAX_BADGE_TEXT: usize = 80;

/// Elements scanned for score labels
const LABEL_SCAN: &str = "div, span";
/// Elements scanned for a certificate count
const CERTIFICATE_SCAN: &str = "div, span, a, h2";

const CODING_SCORE_LABELS: &[&str] = &["coding score"];
const SOLVED_LABELS: &[&str] = &["problems solved", "problem solved"];
const CERTIFICATE_LABELS: &[&str] = &["certificate"];

/// HackerRank adapter
///
/// Reads coding score, problems solved, badges and certifications.
pub struct HackerRank {
    base_url: String,
}

impl HackerRank {
    /// Create an adapter for the public site
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create an adapter against a different host
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for HackerRank {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for HackerRank {
    fn name(&self) -> &'static str {
        "hackerrank"
    }

    fn display_name(&self) -> &'static str {
        "HackerRank"
    }

    fn request(&self, username: &str) -> Result<FetchRequest, ProfileError> {
        let url = profile_url(&self.base_url, &[], username)?;
        Ok(FetchRequest::new(url).accept("text/html,application/xhtml+xml"))
    }

    fn extract(&self, document: &Document, username: &str) -> Result<ProfileRecord, ProfileError> {
        let doc = document.html()?;
        Ok(extract_profile(&doc, &document.url, username))
    }
}

fn extract_profile(doc: &Html, page_url: &str, username: &str) -> ProfileRecord {
    let mut record = ProfileRecord::new("hackerrank", username);

    record.coding_score = FallbackChain::new("coding_score")
        .rule("label scan", |d| {
            labeled_value(d, LABEL_SCAN, CODING_SCORE_LABELS)
        })
        .evaluate(doc);

    record.badges = badges(doc);

    let links = certificate_links(doc, page_url);
    record.certifications = FallbackChain::new("certifications")
        .rule("certificate links", |_| {
            let count = links.len() as u64;
            (count > 0).then_some(count)
        })
        .rule("certificate text", |d| {
            labeled_value(d, CERTIFICATE_SCAN, CERTIFICATE_LABELS)
        })
        .evaluate(doc);
    record.certification_links = links;

    // The last rule is a guess: any positive number on the page.
    record.total_solved = FallbackChain::new("total_solved")
        .rule("label scan", |d| labeled_value(d, LABEL_SCAN, SOLVED_LABELS))
        .rule("first number on page", |d| first_positive(&document_text(d)))
        .evaluate(doc);

    record
}

fn contains_any(text: &str, labels: &[&str]) -> bool {
    let lower = text.to_lowercase();
    labels.iter().any(|label| lower.contains(label))
}

/// Number next to the innermost element matching `css` that mentions a label
///
/// An element is skipped when one of its descendants also matching `css`
/// mentions a label; other markup inside it (`p`, `b`, ...) does not count.
fn labeled_value(doc: &Html, css: &str, labels: &[&str]) -> Option<u64> {
    let sel = selector(css)?;
    doc.select(&sel)
        .filter(|el| contains_any(&element_text(el), labels))
        .filter(|el| {
            !el.select(&sel)
                .filter(|inner| inner.id() != el.id())
                .any(|inner| contains_any(&element_text(&inner), labels))
        })
        .find_map(|el| nearby_number(&el))
}

/// First positive number in the element's own text, then its parent's
fn nearby_number(el: &ElementRef<'_>) -> Option<u64> {
    first_positive(&element_text(el)).or_else(|| parent_text(el).and_then(|t| first_positive(&t)))
}

/// Badge labels from the known badge containers, de-duplicated
fn badges(doc: &Html) -> Vec<String> {
    let Some(sel) = selector(BADGE_SELECTOR) else {
        return Vec::new();
    };
    dedupe_preserving_order(doc.select(&sel).filter_map(|el| badge_label(&el)))
}

/// Label for a single badge
///
/// Prefers an explicit title (element or attribute), then the image's alt
/// text, then short raw text.
fn badge_label(el: &ElementRef<'_>) -> Option<String> {
    let title = selector(".badge-title")
        .and_then(|sel| el.select(&sel).next())
        .map(|t| collapse_whitespace(&element_text(&t)))
        .filter(|t| !t.is_empty());
    if title.is_some() {
        return title;
    }

    if let Some(attr) = el.value().attr("title").map(str::trim).filter(|t| !t.is_empty()) {
        return Some(attr.to_string());
    }

    let alt = selector("img[alt]")
        .and_then(|sel| el.select(&sel).next())
        .and_then(|img| img.value().attr("alt"))
        .map(str::trim)
        .filter(|alt| !alt.is_empty());
    if let Some(alt) = alt {
        return Some(alt.to_string());
    }

    let text = collapse_whitespace(&element_text(el));
    let len = text.chars().count();
    (len > 0 && len < MAX_BADGE_TEXT).then_some(text)
}

/// Absolute certificate URLs in document order, de-duplicated
fn certificate_links(doc: &Html, page_url: &str) -> Vec<String> {
    let Some(sel) = selector(CERTIFICATE_LINK_SELECTOR) else {
        return Vec::new();
    };
    dedupe_preserving_order(
        doc.select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| absolutize(page_url, href)),
    )
}
