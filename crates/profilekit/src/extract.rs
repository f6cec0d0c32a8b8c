//! Shared extraction primitives
//!
//! Platform extractors are built from small, independent rules. Every rule
//! returns `Option`: `None` means "nothing found here" and is never an
//! error. Rules for one field are combined into a [`FallbackChain`] that
//! tries them in order.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{trace, warn};
use url::Url;

/// First digit run, allowing thousands separators inside it
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:,\d{3})*").expect("Failed to parse number regex - this is a bug")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("Failed to parse whitespace regex - this is a bug")
});

/// A single named extraction strategy
type Rule<'a, T> = (&'static str, Box<dyn Fn(&Html) -> Option<T> + 'a>);

/// Ordered list of extraction strategies for one field
///
/// [`evaluate`](FallbackChain::evaluate) returns the first rule's value that
/// is `Some`. An empty result means no rule matched.
pub struct FallbackChain<'a, T> {
    field: &'static str,
    rules: Vec<Rule<'a, T>>,
}

impl<'a, T> FallbackChain<'a, T> {
    /// Start a chain for the named field
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Append a rule; rules run in insertion order
    pub fn rule(mut self, name: &'static str, rule: impl Fn(&Html) -> Option<T> + 'a) -> Self {
        self.rules.push((name, Box::new(rule)));
        self
    }

    /// Run the rules against a document
    pub fn evaluate(&self, doc: &Html) -> Option<T> {
        for (name, rule) in &self.rules {
            if let Some(value) = rule(doc) {
                trace!(field = self.field, rule = *name, "Rule matched");
                return Some(value);
            }
        }
        trace!(field = self.field, "No rule matched");
        None
    }
}

/// Parse a CSS selector, logging instead of panicking on bad input
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = css, error = %e, "Invalid selector");
            None
        }
    }
}

/// Extract the first maximal digit run from text
///
/// `"Rating: 1,876 (Div 2)"` yields `1876`. Returns `None` for text without
/// digits or runs that overflow.
pub fn first_number(text: &str) -> Option<u64> {
    let m = NUMBER.find(text)?;
    m.as_str().replace(',', "").parse().ok()
}

/// First number strictly greater than zero
pub fn first_positive(text: &str) -> Option<u64> {
    first_number(text).filter(|n| *n > 0)
}

/// Capture group 1 of `pattern` in `text`, parsed as a number
pub fn capture_number(pattern: &Regex, text: &str) -> Option<u64> {
    let caps = pattern.captures(text)?;
    first_number(caps.get(1)?.as_str())
}

/// Concatenated text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Text content of the whole document, with text nodes space-separated
pub fn document_text(doc: &Html) -> String {
    doc.root_element().text().collect::<Vec<_>>().join(" ")
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Trimmed text of the first element matching `css`, if non-empty
pub fn select_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .map(|el| element_text(&el).trim().to_string())
        .find(|text| !text.is_empty())
}

/// First number found in any element matching `css`, in document order
pub fn select_number(doc: &Html, css: &str) -> Option<u64> {
    let sel = selector(css)?;
    doc.select(&sel).find_map(|el| first_number(&element_text(&el)))
}

/// Text of the parent element, if the parent is an element
pub fn parent_text(element: &ElementRef<'_>) -> Option<String> {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| element_text(&parent))
}

/// First following sibling that is an element
pub fn next_element_sibling<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Drop empty entries and duplicates, keeping first-seen order
pub fn dedupe_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

/// Resolve a possibly relative link against the page URL
///
/// Absolute links pass through unchanged. Returns `None` for empty or
/// unparseable hrefs.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(href) {
        return Some(url.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}
