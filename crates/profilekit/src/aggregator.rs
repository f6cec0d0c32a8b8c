//! Concurrent multi-platform aggregation
//!
//! [`Aggregator`] is the library entry point: it owns the platform
//! registry, the HTTP fetcher and an optional [`ProfileCache`], and turns a
//! list of (platform, username) pairs into one record per distinct pair.

use crate::cache::ProfileCache;
use crate::client::{DocumentFetcher, FetchOptions};
use crate::error::FetchError;
use crate::platforms::PlatformRegistry;
use crate::types::{ProfileRecord, ProfileRequest, StatsQuery, StatsResponse};
use crate::DEFAULT_CACHE_TTL;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Builder for configuring an [`Aggregator`]
pub struct AggregatorBuilder {
    options: FetchOptions,
    cache_ttl: Option<Duration>,
    cache: Option<Arc<ProfileCache>>,
    registry: Option<PlatformRegistry>,
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregatorBuilder {
    /// Create a builder with default options and caching enabled
    pub fn new() -> Self {
        Self {
            options: FetchOptions::default(),
            cache_ttl: Some(DEFAULT_CACHE_TTL),
            cache: None,
            registry: None,
        }
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Enable caching with the given entry lifetime
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Disable caching
    pub fn no_cache(mut self) -> Self {
        self.cache_ttl = None;
        self.cache = None;
        self
    }

    /// Use an existing cache, e.g. one shared between aggregators
    pub fn cache(mut self, cache: Arc<ProfileCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the built-in platform registry
    pub fn registry(mut self, registry: PlatformRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the aggregator
    pub fn build(self) -> Result<Aggregator, FetchError> {
        let fetcher = DocumentFetcher::new(&self.options)?;
        let cache = self
            .cache
            .or_else(|| self.cache_ttl.map(|ttl| Arc::new(ProfileCache::new(ttl))));

        Ok(Aggregator {
            registry: Arc::new(self.registry.unwrap_or_else(PlatformRegistry::with_defaults)),
            fetcher,
            cache,
        })
    }
}

/// Resolves profile requests against the registered platforms
///
/// Cloning is cheap; clones share the registry, client and cache.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<PlatformRegistry>,
    fetcher: DocumentFetcher,
    cache: Option<Arc<ProfileCache>>,
}

impl Aggregator {
    /// Create a new aggregator builder
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::new()
    }

    /// Registered platform identifiers, in reporting order
    pub fn platform_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    /// The record cache, if enabled
    pub fn cache(&self) -> Option<&Arc<ProfileCache>> {
        self.cache.as_ref()
    }

    /// Resolve many pairs concurrently
    ///
    /// Duplicate pairs are resolved once, keeping the first occurrence.
    /// Records come back in request order; one failing pair never affects
    /// the others.
    pub async fn aggregate(&self, requests: &[ProfileRequest]) -> Vec<ProfileRecord> {
        let mut seen = HashSet::new();
        let unique: Vec<&ProfileRequest> = requests
            .iter()
            .filter(|request| seen.insert((*request).clone()))
            .collect();

        debug!(
            requested = requests.len(),
            unique = unique.len(),
            "Aggregating profiles"
        );

        let records = join_all(unique.into_iter().map(|request| self.resolve(request))).await;

        let failed = records.iter().filter(|r| r.error.is_some()).count();
        info!(profiles = records.len(), failed, "Aggregation complete");
        records
    }

    /// Resolve a single pair, consulting the cache first
    pub async fn resolve(&self, request: &ProfileRequest) -> ProfileRecord {
        if let Some(cache) = &self.cache {
            if let Some(record) = cache.get(request).await {
                return record;
            }
        }

        let record = self
            .registry
            .resolve(&self.fetcher, &request.platform, &request.username)
            .await;

        if let Some(cache) = &self.cache {
            cache.set(request.clone(), record.clone()).await;
        }
        record
    }

    /// Answer a parsed stats query
    pub async fn query(&self, query: &StatsQuery) -> StatsResponse {
        StatsResponse {
            profiles: self.aggregate(&query.requests()).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder_defaults() {
        let aggregator = Aggregator::builder().build().unwrap();
        assert_eq!(
            aggregator.platform_names(),
            vec!["leetcode", "gfg", "codechef", "hackerrank"]
        );
        assert_eq!(aggregator.cache().unwrap().ttl(), DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_builder_no_cache() {
        let aggregator = Aggregator::builder()
            .cache_ttl(Duration::from_secs(5))
            .no_cache()
            .build()
            .unwrap();
        assert!(aggregator.cache().is_none());
    }

    #[test]
    fn test_builder_shared_cache() {
        let cache = Arc::new(ProfileCache::new(Duration::from_secs(5)));
        let aggregator = Aggregator::builder()
            .cache(cache.clone())
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(aggregator.cache().unwrap(), &cache));
    }

    #[tokio::test]
    async fn test_duplicates_resolved_once_in_order() {
        let aggregator = Aggregator::builder()
            .registry(PlatformRegistry::new())
            .build()
            .unwrap();

        let records = aggregator
            .aggregate(&[
                ProfileRequest::new("topcoder", "alice"),
                ProfileRequest::new("atcoder", "bob"),
                ProfileRequest::new("TopCoder", "alice"),
            ])
            .await;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform, "topcoder");
        assert_eq!(records[1].platform, "atcoder");
        assert!(records
            .iter()
            .all(|r| r.error.as_deref() == Some("unsupported platform")));
    }

    #[tokio::test]
    async fn test_empty_query() {
        let aggregator = Aggregator::builder().build().unwrap();
        let query = StatsQuery::from_params(&HashMap::new(), &aggregator.platform_names());

        let response = aggregator.query(&query).await;

        assert!(response.profiles.is_empty());
    }

    #[tokio::test]
    async fn test_query_single_unsupported() {
        let aggregator = Aggregator::builder().build().unwrap();
        let params: HashMap<String, String> = [
            ("platform".to_string(), "topcoder".to_string()),
            ("username".to_string(), "alice".to_string()),
        ]
        .into_iter()
        .collect();
        let query = StatsQuery::from_params(&params, &aggregator.platform_names());

        let response = aggregator.query(&query).await;

        assert_eq!(response.profiles.len(), 1);
        assert_eq!(response.profiles[0].username, "alice");
        assert_eq!(
            response.profiles[0].error.as_deref(),
            Some("unsupported platform")
        );
        assert!(aggregator.cache().unwrap().is_empty().await);
    }
}
