//! GeeksforGeeks profile adapter
//!
//! Profile page at `https://auth.geeksforgeeks.org/user/{username}`. The
//! page is rendered with hashed CSS module class names, so every structural
//! rule is backed by a looser `[class*=...]` or text fallback.

use crate::client::Document;
use crate::error::ProfileError;
use crate::extract::{
    capture_number, document_text, element_text, first_number, next_element_sibling,
    select_text, selector, FallbackChain,
};
use crate::platforms::{profile_url, Platform};
use crate::types::{FetchRequest, ProfileRecord};
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

const DEFAULT_BASE_URL: &str = "https://auth.geeksforgeeks.org";

const SCORE_LABEL: &str = ".scoreCard_head_left--text__KZ2S1";
const SCORE_LABEL_LOOSE: &str = "[class*='scoreCard_head_left--text']";
const STREAK: &str = ".circularProgressBar_head_mid_streakCnt__MFOF1";
const STREAK_LOOSE: &str = "[class*='streakCnt']";
const DIFFICULTY_TAB: &str = ".problemNavbar_head_nav__a4K6P .problemNavbar_head_nav--text__UaGCx";
const DIFFICULTY_TAB_LOOSE: &str = "[class*='problemNavbar_head_nav--text']";

static PROBLEMS_SOLVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)problems?\s+solved\s*:?\s*(\d[\d,]*)")
        .expect("Failed to parse problems solved regex - this is a bug")
});

/// Difficulty tier a category label is counted towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Easy,
    Medium,
    Hard,
}

impl Tier {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "SCHOOL" | "BASIC" | "EASY" => Some(Tier::Easy),
            "MEDIUM" => Some(Tier::Medium),
            "HARD" => Some(Tier::Hard),
            _ => None,
        }
    }
}

/// Solved counts per difficulty tier
#[derive(Debug, Default, PartialEq, Eq)]
struct TierCounts {
    easy: Option<u64>,
    medium: Option<u64>,
    hard: Option<u64>,
}

impl TierCounts {
    fn add(&mut self, tier: Tier, count: u64) {
        let slot = match tier {
            Tier::Easy => &mut self.easy,
            Tier::Medium => &mut self.medium,
            Tier::Hard => &mut self.hard,
        };
        *slot = Some(slot.unwrap_or(0).saturating_add(count));
    }

    fn is_empty(&self) -> bool {
        self.easy.is_none() && self.medium.is_none() && self.hard.is_none()
    }
}

/// GeeksforGeeks adapter
///
/// Reads the score cards (problems solved, coding score, contest rating),
/// the current streak and the per-difficulty breakdown.
pub struct GeeksForGeeks {
    base_url: String,
}

impl GeeksForGeeks {
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

impl Default for GeeksForGeeks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Platform for GeeksForGeeks {
    fn name(&self) -> &'static str {
        "gfg"
    }

    fn display_name(&self) -> &'static str {
        "GFG"
    }

    fn request(&self, username: &str) -> Result<FetchRequest, ProfileError> {
        let url = profile_url(&self.base_url, &["user"], username)?;
        Ok(FetchRequest::new(url).accept("text/html,application/xhtml+xml"))
    }

    fn extract(&self, document: &Document, username: &str) -> Result<ProfileRecord, ProfileError> {
        let doc = document.html()?;
        Ok(extract_profile(&doc, username))
    }
}

fn extract_profile(doc: &Html, username: &str) -> ProfileRecord {
    let mut record = ProfileRecord::new("gfg", username);

    record.total_solved = FallbackChain::new("total_solved")
        .rule("score card", |d| score_card(d, SCORE_LABEL, "Problem Solved"))
        .rule("loose score card", |d| {
            score_card(d, SCORE_LABEL_LOOSE, "Problem Solved")
        })
        .rule("problems solved text", |d| {
            capture_number(&PROBLEMS_SOLVED, &document_text(d))
        })
        .evaluate(doc);

    record.coding_score = FallbackChain::new("coding_score")
        .rule("score card", |d| score_card(d, SCORE_LABEL, "Coding Score"))
        .rule("loose score card", |d| {
            score_card(d, SCORE_LABEL_LOOSE, "Coding Score")
        })
        .evaluate(doc);

    record.rating = FallbackChain::new("rating")
        .rule("score card", |d| score_card(d, SCORE_LABEL, "Contest Rating"))
        .rule("loose score card", |d| {
            score_card(d, SCORE_LABEL_LOOSE, "Contest Rating")
        })
        .evaluate(doc);

    record.streak = FallbackChain::new("streak")
        .rule("streak counter", |d| streak(d, STREAK))
        .rule("loose streak counter", |d| streak(d, STREAK_LOOSE))
        .evaluate(doc);

    let tiers = FallbackChain::new("difficulty")
        .rule("difficulty tabs", |d| difficulty(d, DIFFICULTY_TAB))
        .rule("loose difficulty tabs", |d| difficulty(d, DIFFICULTY_TAB_LOOSE))
        .evaluate(doc)
        .unwrap_or_default();
    record.easy_solved = tiers.easy;
    record.medium_solved = tiers.medium;
    record.hard_solved = tiers.hard;

    record
}

/// Value of the score card whose label text equals `label` exactly
///
/// The value is the label's next sibling element.
fn score_card(doc: &Html, label_css: &str, label: &str) -> Option<u64> {
    let sel = selector(label_css)?;
    doc.select(&sel)
        .filter(|el| element_text(el).trim() == label)
        .find_map(|el| {
            let value = next_element_sibling(&el)?;
            first_number(&element_text(&value))
        })
}

/// Numerator of a `current/total` streak counter
fn streak(doc: &Html, css: &str) -> Option<u64> {
    let text = select_text(doc, css)?;
    let current = text.split('/').next()?;
    first_number(current)
}

/// Sum `NAME (N)` category tabs into difficulty tiers
///
/// Returns `None` when no tab maps to a known tier.
fn difficulty(doc: &Html, css: &str) -> Option<TierCounts> {
    let sel = selector(css)?;
    let mut counts = TierCounts::default();

    for el in doc.select(&sel) {
        if let Some((tier, count)) = parse_category(&element_text(&el)) {
            counts.add(tier, count);
        }
    }

    if counts.is_empty() {
        None
    } else {
        Some(counts)
    }
}

/// Parse a category label such as `"SCHOOL (3)"` or `"EASY(2)"`
fn parse_category(text: &str) -> Option<(Tier, u64)> {
    let (label, rest) = text.trim().split_once('(')?;
    let tier = Tier::from_label(label)?;
    let count = first_number(rest)?;
    Some((tier, count))
}
