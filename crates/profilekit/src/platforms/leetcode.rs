//! LeetCode profile adapter
//!
//! Queries the public GraphQL endpoint for accepted-submission counts by
//! difficulty.

use crate::client::Document;
use crate::error::{FetchError, ProfileError};
use crate::platforms::Platform;
use crate::types::{FetchRequest, ProfileRecord};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://leetcode.com";

const PROFILE_QUERY: &str = r#"query userProfile($username: String!) {
  matchedUser(username: $username) {
    username
    submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
      }
    }
  }
}"#;

/// LeetCode adapter
///
/// Sends a single GraphQL query and maps the `All`/`Easy`/`Medium`/`Hard`
/// breakdown onto the record.
pub struct LeetCode {
    base_url: String,
}

impl LeetCode {
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

impl Default for LeetCode {
    fn default() -> Self {
        Self::new()
    }
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ProfileData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileData {
    matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchedUser {
    submit_stats_global: Option<SubmitStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitStats {
    ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
struct DifficultyCount {
    difficulty: String,
    count: u64,
}

#[async_trait]
impl Platform for LeetCode {
    fn name(&self) -> &'static str {
        "leetcode"
    }

    fn display_name(&self) -> &'static str {
        "LeetCode"
    }

    fn request(&self, username: &str) -> Result<FetchRequest, ProfileError> {
        let url = format!("{}/graphql", self.base_url.trim_end_matches('/'));
        Ok(FetchRequest::new(url)
            .accept("application/json")
            .json(json!({
                "query": PROFILE_QUERY,
                "variables": { "username": username },
            })))
    }

    fn extract(&self, document: &Document, username: &str) -> Result<ProfileRecord, ProfileError> {
        let response: GraphQlResponse = document.json()?;
        build_record(response, username)
    }
}

fn build_record(response: GraphQlResponse, username: &str) -> Result<ProfileRecord, ProfileError> {
    let data = response.data.ok_or_else(|| {
        let reason = response
            .errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "response has no data".to_string());
        FetchError::ParseFailure(reason)
    })?;

    let user = data.matched_user.ok_or(ProfileError::UserNotFound)?;

    let stats = user.submit_stats_global.ok_or_else(|| {
        FetchError::ParseFailure("matchedUser has no submitStatsGlobal".to_string())
    })?;

    let mut record = ProfileRecord::new("leetcode", username);
    for entry in stats.ac_submission_num {
        match entry.difficulty.as_str() {
            "All" => record.total_solved = Some(entry.count),
            "Easy" => record.easy_solved = Some(entry.count),
            "Medium" => record.medium_solved = Some(entry.count),
            "Hard" => record.hard_solved = Some(entry.count),
            _ => {}
        }
    }

    Ok(record)
}
