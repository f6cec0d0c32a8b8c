//! Platform adapters for profile extraction
//!
//! Design: Each platform binds an identifier to a request template and an
//! extractor. PlatformRegistry dispatches to the adapter registered for the
//! requested identifier and folds every failure into the returned record.

mod codechef;
mod gfg;
mod hackerrank;
mod leetcode;

pub use codechef::CodeChef;
pub use gfg::GeeksForGeeks;
pub use hackerrank::HackerRank;
pub use leetcode::LeetCode;

use crate::client::{Document, DocumentFetcher};
use crate::error::{FetchError, ProfileError};
use crate::types::{FetchRequest, ProfileRecord};
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

/// Trait for profile sources
///
/// Implement this trait to add a platform. The provided
/// [`fetch_profile`](Platform::fetch_profile) issues the request built by
/// [`request`](Platform::request) and hands the document to
/// [`extract`](Platform::extract).
#[async_trait]
pub trait Platform: Send + Sync {
    /// Identifier used in queries (for example `"leetcode"`)
    fn name(&self) -> &'static str;

    /// Human readable name used in error messages
    fn display_name(&self) -> &'static str;

    /// Returns true if this adapter handles the given identifier
    fn matches(&self, platform: &str) -> bool {
        self.name().eq_ignore_ascii_case(platform.trim())
    }

    /// Build the request for a username
    fn request(&self, username: &str) -> Result<FetchRequest, ProfileError>;

    /// Extract a record from a fetched document
    ///
    /// Missing fields are left as `None`. Only a document that cannot be
    /// interpreted at all, or an explicit upstream "no such user", is an
    /// error.
    fn extract(&self, document: &Document, username: &str) -> Result<ProfileRecord, ProfileError>;

    /// Fetch and extract a profile
    async fn fetch_profile(
        &self,
        fetcher: &DocumentFetcher,
        username: &str,
    ) -> Result<ProfileRecord, ProfileError> {
        let request = self.request(username)?;
        let document = fetcher.fetch(&request).await?;
        self.extract(&document, username)
    }
}

/// Build `{base}/{prefix...}/{username}` with the username percent-encoded
pub(crate) fn profile_url(
    base: &str,
    prefix: &[&str],
    username: &str,
) -> Result<String, FetchError> {
    let mut url =
        Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot be a base", base)))?;
        segments.pop_if_empty();
        segments.extend(prefix);
        segments.push(username);
    }
    Ok(url.to_string())
}

/// Registry of platform adapters
///
/// Maintains an ordered list of adapters. The order is also the order in
/// which multi-platform query parameters are reported.
pub struct PlatformRegistry {
    platforms: Vec<Box<dyn Platform>>,
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            platforms: Vec::new(),
        }
    }

    /// Create a registry with the built-in platforms
    ///
    /// Includes (in order): LeetCode, GeeksforGeeks, CodeChef, HackerRank.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LeetCode::new()));
        registry.register(Box::new(GeeksForGeeks::new()));
        registry.register(Box::new(CodeChef::new()));
        registry.register(Box::new(HackerRank::new()));
        registry
    }

    /// Register a platform
    ///
    /// A later registration with the same name never shadows an earlier one.
    pub fn register(&mut self, platform: Box<dyn Platform>) {
        self.platforms.push(platform);
    }

    /// Registered identifiers in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.platforms.iter().map(|p| p.name()).collect()
    }

    /// Look up the adapter for an identifier
    pub fn get(&self, platform: &str) -> Option<&dyn Platform> {
        self.platforms
            .iter()
            .find(|p| p.matches(platform))
            .map(|p| &**p)
    }

    /// Resolve one (platform, username) pair into a record
    ///
    /// Never fails: unsupported platforms, transport faults and parse
    /// faults are all reported through the record's `error` field.
    pub async fn resolve(
        &self,
        fetcher: &DocumentFetcher,
        platform: &str,
        username: &str,
    ) -> ProfileRecord {
        let Some(adapter) = self.get(platform) else {
            debug!(platform, "No adapter registered");
            return ProfileRecord::failed(
                platform,
                username,
                ProfileError::UnsupportedPlatform.to_string(),
            );
        };

        debug!(platform = adapter.name(), username, "Using platform adapter");

        match adapter.fetch_profile(fetcher, username).await {
            Ok(record) => record,
            Err(err) => {
                warn!(platform = adapter.name(), username, error = %err, "Profile fetch failed");
                let message = describe_failure(adapter, username, &err);
                ProfileRecord::failed(adapter.name(), username, message)
            }
        }
    }
}

/// Message stored in a failed record
fn describe_failure(adapter: &dyn Platform, username: &str, err: &ProfileError) -> String {
    match err {
        ProfileError::Fetch(cause) => format!(
            "could not fetch {} data for user {}: {}",
            adapter.display_name(),
            username,
            cause
        ),
        other => other.to_string(),
    }
}
