//! HTTP client for ProfileKit
//!
//! [`DocumentFetcher`] performs a single GET or POST with a bounded timeout
//! and hands back a [`Document`] that platform extractors parse as HTML or
//! decode as JSON. The actual extraction logic lives in the
//! [`platforms`](crate::platforms) module.

use crate::error::FetchError;
use crate::types::{FetchRequest, HttpMethod};
use crate::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use scraper::Html;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Maximum number of characters of an error body kept for diagnostics
const ERROR_BODY_LIMIT: usize = 512;

/// Fetch options that can be configured via the aggregator builder
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Per-request timeout (connect + full body)
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Performs HTTP requests for platform adapters
///
/// Holds one shared client; cloning is cheap.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl DocumentFetcher {
    /// Build a fetcher from options
    pub fn new(options: &FetchOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    /// Fetch a document
    ///
    /// Single attempt. Non-2xx responses become [`FetchError::BadStatus`].
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Document, FetchError> {
        let url = url::Url::parse(&request.url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };

        builder = builder.header(ACCEPT, request.accept.unwrap_or("*/*"));
        if let Some(ref body) = request.json_body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }

        debug!(method = %request.method, url = %request.url, "Fetching document");

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            // Diagnostic only; an unreadable body still reports the status.
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::BadStatus {
                status: status.as_u16(),
                body: truncate_chars(body.trim(), ERROR_BODY_LIMIT),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        Ok(Document {
            url: request.url.clone(),
            content_type,
            body,
        })
    }
}

/// A fetched response body
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The fetched URL
    pub url: String,
    /// Content-Type header value
    pub content_type: Option<String>,
    /// Raw body text
    pub body: String,
}

impl Document {
    /// Wrap an HTML body, e.g. one loaded from disk
    pub fn from_html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// Wrap a JSON body
    pub fn from_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// Parse the body into a queryable HTML tree
    pub fn html(&self) -> Result<Html, FetchError> {
        if !is_html(&self.content_type, &self.body) {
            return Err(FetchError::ParseFailure(
                "response body is not an HTML document".to_string(),
            ));
        }
        Ok(Html::parse_document(&self.body))
    }

    /// Decode the body into a typed JSON schema
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|e| FetchError::ParseFailure(e.to_string()))
    }
}

/// Check if content is HTML based on content type and body
fn is_html(content_type: &Option<String>, body: &str) -> bool {
    if let Some(ct) = content_type {
        let ct_lower = ct.to_lowercase();
        if ct_lower.contains("text/html") || ct_lower.contains("application/xhtml") {
            return !body.trim().is_empty();
        }
    }

    body.trim_start().starts_with('<')
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_is_html() {
        let html = Some("text/html; charset=utf-8".to_string());
        let plain = Some("text/plain".to_string());

        assert!(is_html(&html, "<div>hi</div>"));
        assert!(is_html(&html, "hello"));
        assert!(!is_html(&html, "   "));
        assert!(is_html(&plain, "  <!DOCTYPE html><html></html>"));
        assert!(!is_html(&plain, "{\"a\": 1}"));
        assert!(!is_html(&None, ""));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ééééé", 2), "éé...");
    }

    #[test]
    fn test_document_html_rejects_non_markup() {
        let doc = Document {
            url: "https://example.com".to_string(),
            content_type: Some("application/json".to_string()),
            body: "{}".to_string(),
        };
        assert!(matches!(doc.html(), Err(FetchError::ParseFailure(_))));
    }

    #[test]
    fn test_document_json_schema_mismatch() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Expected {
            data: u32,
        }

        let doc = Document::from_json("https://example.com", r#"{"other": true}"#);
        assert!(matches!(
            doc.json::<Expected>(),
            Err(FetchError::ParseFailure(_))
        ));

        let doc = Document::from_json("https://example.com", r#"{"data": 7}"#);
        assert_eq!(doc.json::<Expected>().unwrap().data, 7);
    }

    #[test]
    fn test_fetch_options_default() {
        let options = FetchOptions::default();
        assert!(options.user_agent.is_none());
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = DocumentFetcher::new(&FetchOptions::default()).unwrap();
        let result = fetcher.fetch(&FetchRequest::new("not a url")).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
