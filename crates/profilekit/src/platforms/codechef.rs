//! CodeChef profile adapter
//!
//! Rating-centric profile page at `https://www.codechef.com/users/{username}`.

use crate::client::Document;
use crate::error::ProfileError;
use crate::extract::{
    capture_number, document_text, element_text, first_number, select_number, selector,
    FallbackChain,
};
use crate::platforms::{profile_url, Platform};
use crate::types::{FetchRequest, ProfileRecord};
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

const DEFAULT_BASE_URL: &str = "https://www.codechef.com";

static HIGHEST_RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)highest\s+rating\s*:?\s*(\d[\d,]*)")
        .expect("Failed to parse highest rating regex - this is a bug")
});

static TOTAL_SOLVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)total\s+problems\s+solved\s*:?\s*(\d[\d,]*)")
        .expect("Failed to parse total solved regex - this is a bug")
});

/// CodeChef adapter
///
/// Reads current and highest rating, global and country rank, contest count
/// and total problems solved.
pub struct CodeChef {
    base_url: String,
}

impl CodeChef {
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

impl Default for CodeChef {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for CodeChef {
    fn name(&self) -> &'static str {
        "codechef"
    }

    fn display_name(&self) -> &'static str {
        "CodeChef"
    }

    fn request(&self, username: &str) -> Result<FetchRequest, ProfileError> {
        let url = profile_url(&self.base_url, &["users"], username)?;
        Ok(FetchRequest::new(url).accept("text/html,application/xhtml+xml"))
    }

    fn extract(&self, document: &Document, username: &str) -> Result<ProfileRecord, ProfileError> {
        let doc = document.html()?;
        Ok(extract_profile(&doc, username))
    }
}

fn extract_profile(doc: &Html, username: &str) -> ProfileRecord {
    let mut record = ProfileRecord::new("codechef", username);

    record.rating = FallbackChain::new("rating")
        .rule("rating header", |d| {
            select_number(d, ".rating-header .rating-number")
        })
        .rule("any rating number", |d| select_number(d, ".rating-number"))
        .evaluate(doc);

    record.max_rating = FallbackChain::new("max_rating")
        .rule("rating header note", |d| {
            select_number(d, ".rating-header small")
        })
        .rule("highest rating text", |d| {
            capture_number(&HIGHEST_RATING, &document_text(d))
        })
        .evaluate(doc);

    let (global_rank, country_rank) = ranks(doc);
    record.global_rank = global_rank;
    record.country_rank = country_rank;

    record.contests_participated = FallbackChain::new("contests_participated")
        .rule("count badge", |d| {
            select_number(d, ".contest-participated-count b")
        })
        .rule("count container", |d| {
            select_number(d, ".contest-participated-count")
        })
        .evaluate(doc);

    record.total_solved = FallbackChain::new("total_solved")
        .rule("problems solved heading", |d| {
            select_number(d, ".rating-data-section.problems-solved h3")
        })
        .rule("problems solved text", |d| {
            capture_number(&TOTAL_SOLVED, &document_text(d))
        })
        .evaluate(doc);

    record
}

/// Global and country rank from the first two rank entries
///
/// Entries such as `Inactive` are absent, as is a rank of zero.
fn ranks(doc: &Html) -> (Option<u64>, Option<u64>) {
    let Some(sel) = selector(".rating-ranks li strong") else {
        return (None, None);
    };
    let mut entries = doc
        .select(&sel)
        .map(|el| first_number(element_text(&el).trim()).filter(|n| *n > 0));

    let global = entries.next().flatten();
    let country = entries.next().flatten();
    (global, country)
}
