//! Core types for ProfileKit

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP method for a document request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET request
    #[default]
    Get,
    /// HTTP POST request with a JSON body
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Request for a single source document
#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    /// The URL to fetch
    pub url: String,

    /// HTTP method (default GET)
    pub method: HttpMethod,

    /// Accept header override
    pub accept: Option<&'static str>,

    /// JSON body, sent with POST requests
    pub json_body: Option<serde_json::Value>,
}

impl FetchRequest {
    /// Create a GET request for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the Accept header
    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Turn this into a POST carrying the given JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.method = HttpMethod::Post;
        self.json_body = Some(body);
        self
    }
}

/// A (platform, username) pair to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileRequest {
    /// Platform identifier, lowercase
    pub platform: String,
    /// Username on that platform
    pub username: String,
}

impl ProfileRequest {
    /// Create a normalized request: platform lowercased, both trimmed
    pub fn new(platform: impl AsRef<str>, username: impl AsRef<str>) -> Self {
        Self {
            platform: platform.as_ref().trim().to_lowercase(),
            username: username.as_ref().trim().to_string(),
        }
    }
}

/// Normalized profile statistics for one (platform, username) pair
///
/// Every optional field is omitted from JSON when absent. A record with
/// `error` set may still carry fields extracted before the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Source platform identifier
    pub platform: String,

    /// Queried username
    pub username: String,

    /// Total problems solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_solved: Option<u64>,

    /// Easy-tier problems solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easy_solved: Option<u64>,

    /// Medium-tier problems solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium_solved: Option<u64>,

    /// Hard-tier problems solved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_solved: Option<u64>,

    /// Current rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u64>,

    /// Highest rating reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u64>,

    /// Consecutive-activity count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u64>,

    /// Number of contests entered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contests_participated: Option<u64>,

    /// Global rank (positive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_rank: Option<u64>,

    /// Country rank (positive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_rank: Option<u64>,

    /// Platform-specific composite score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_score: Option<u64>,

    /// Distinct badge labels in first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,

    /// Number of certifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<u64>,

    /// Absolute certificate URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certification_links: Vec<String>,

    /// Extraction or transport failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProfileRecord {
    /// Create an empty record for the given pair
    pub fn new(platform: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Create a record carrying only an error
    pub fn failed(
        platform: impl Into<String>,
        username: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(platform, username)
        }
    }

    /// True if no numeric field has been populated
    pub fn has_no_counts(&self) -> bool {
        [
            self.total_solved,
            self.easy_solved,
            self.medium_solved,
            self.hard_solved,
            self.rating,
            self.max_rating,
            self.streak,
            self.contests_participated,
            self.global_rank,
            self.country_rank,
            self.coding_score,
            self.certifications,
        ]
        .iter()
        .all(Option::is_none)
    }
}

/// Aggregated response body: `{"profiles": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    /// One record per requested pair
    pub profiles: Vec<ProfileRecord>,
}

/// Parsed stats query
///
/// Either a single `platform` + `username` pair, or one parameter per
/// platform name (`?leetcode=alice&gfg=bob`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    /// Single-mode pair, present only when both values were non-empty
    pub single: Option<ProfileRequest>,
    /// Multi-mode pairs in platform order
    pub multi: Vec<ProfileRequest>,
}

impl StatsQuery {
    /// Build a query from raw parameters
    ///
    /// `platforms` lists the platform names that are accepted as
    /// multi-mode parameters, in the order their records should appear.
    pub fn from_params(params: &HashMap<String, String>, platforms: &[&str]) -> Self {
        let non_empty = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let multi = platforms
            .iter()
            .filter_map(|name| non_empty(name).map(|user| ProfileRequest::new(name, user)))
            .collect();

        let single = match (non_empty("platform"), non_empty("username")) {
            (Some(platform), Some(username)) => Some(ProfileRequest::new(platform, username)),
            _ => None,
        };

        Self { single, multi }
    }

    /// Requests to resolve: multi-mode entries win over the single pair
    pub fn requests(&self) -> Vec<ProfileRequest> {
        if !self.multi.is_empty() {
            return self.multi.clone();
        }
        self.single.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLATFORMS: &[&str] = &["leetcode", "gfg", "codechef", "hackerrank"];

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[test]
    fn test_fetch_request_builder() {
        let req = FetchRequest::new("https://example.com/graphql")
            .accept("application/json")
            .json(serde_json::json!({"query": "{}"}));

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.accept, Some("application/json"));
        assert!(req.json_body.is_some());
    }

    #[test]
    fn test_profile_request_normalizes() {
        let req = ProfileRequest::new(" LeetCode ", "  alice ");
        assert_eq!(req.platform, "leetcode");
        assert_eq!(req.username, "alice");
    }

    #[test]
    fn test_empty_record_serializes_only_identity() {
        let record = ProfileRecord::new("gfg", "bob");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"platform": "gfg", "username": "bob"})
        );
    }

    #[test]
    fn test_record_uses_camel_case_and_keeps_zero() {
        let record = ProfileRecord {
            total_solved: Some(12),
            contests_participated: Some(0),
            certification_links: vec!["https://example.com/c/1".to_string()],
            ..ProfileRecord::new("codechef", "carol")
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"totalSolved\":12"));
        assert!(json.contains("\"contestsParticipated\":0"));
        assert!(json.contains("\"certificationLinks\":[\"https://example.com/c/1\"]"));
        assert!(!json.contains("badges"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_failed_record() {
        let record = ProfileRecord::failed("foo", "bar", "unsupported platform");
        assert_eq!(record.error.as_deref(), Some("unsupported platform"));
        assert!(record.has_no_counts());
    }

    #[test]
    fn test_query_multi_mode_takes_precedence() {
        let query = StatsQuery::from_params(
            &params(&[
                ("platform", "codechef"),
                ("username", "carol"),
                ("gfg", "bob"),
                ("leetcode", "alice"),
            ]),
            PLATFORMS,
        );

        let requests = query.requests();
        assert_eq!(
            requests,
            vec![
                ProfileRequest::new("leetcode", "alice"),
                ProfileRequest::new("gfg", "bob"),
            ]
        );
    }

    #[test]
    fn test_query_single_mode() {
        let query = StatsQuery::from_params(
            &params(&[("platform", "CodeChef"), ("username", " carol ")]),
            PLATFORMS,
        );
        assert_eq!(
            query.requests(),
            vec![ProfileRequest::new("codechef", "carol")]
        );
    }

    #[test]
    fn test_query_blank_multi_values_ignored() {
        let query = StatsQuery::from_params(
            &params(&[("leetcode", "  "), ("platform", "gfg"), ("username", "bob")]),
            PLATFORMS,
        );
        assert_eq!(query.requests(), vec![ProfileRequest::new("gfg", "bob")]);
    }

    #[test]
    fn test_query_incomplete_single_is_empty() {
        let query = StatsQuery::from_params(&params(&[("platform", "gfg")]), PLATFORMS);
        assert!(query.requests().is_empty());

        let query = StatsQuery::from_params(&params(&[]), PLATFORMS);
        assert!(query.requests().is_empty());
    }
}
