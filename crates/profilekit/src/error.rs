//! Error types for ProfileKit

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a source document
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Unexpected HTTP status {status}: {body}")]
    BadStatus {
        /// HTTP status code
        status: u16,
        /// Response body, truncated for diagnostics
        body: String,
    },

    /// Body could not be read or did not have the expected shape
    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else if err.is_decode() || err.is_body() {
            FetchError::ParseFailure(err.to_string())
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors produced while resolving a single profile
///
/// These never leave the platform registry; they are folded into the
/// `error` field of the returned record.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No adapter registered for the requested platform
    #[error("unsupported platform")]
    UnsupportedPlatform,

    /// The upstream API reported that the user does not exist
    #[error("user not found")]
    UserNotFound,

    /// Transport or parse failure
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProfileError::UnsupportedPlatform.to_string(),
            "unsupported platform"
        );
        assert_eq!(ProfileError::UserNotFound.to_string(), "user not found");
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(12)).to_string(),
            "Request timed out after 12s"
        );
        assert_eq!(
            FetchError::BadStatus {
                status: 404,
                body: "Not Found".to_string()
            }
            .to_string(),
            "Unexpected HTTP status 404: Not Found"
        );
    }

    #[test]
    fn test_profile_error_wraps_fetch_error() {
        let err: ProfileError = FetchError::ParseFailure("missing data".to_string()).into();
        assert_eq!(err.to_string(), "Failed to parse response: missing data");
    }
}
