//! ProfileKit - competitive programming profile aggregation
//!
//! Fetches public profile data from several coding platforms and normalizes
//! it into [`ProfileRecord`]s.
//!
//! ## Platform System
//!
//! Each platform is an adapter implementing [`Platform`]: it builds a
//! request for a username and extracts a record from the fetched document.
//! The [`PlatformRegistry`] dispatches by platform identifier, and the
//! [`Aggregator`] resolves many (platform, username) pairs concurrently.
//!
//! Built-in platforms:
//! - [`LeetCode`] - GraphQL API, difficulty breakdown
//! - [`GeeksForGeeks`] - score cards, streak, difficulty tabs
//! - [`CodeChef`] - ratings, ranks, contests
//! - [`HackerRank`] - coding score, badges, certificates
//!
//! ## Example
//!
//! ```no_run
//! use profilekit::{Aggregator, ProfileRequest};
//!
//! # async fn run() -> Result<(), profilekit::FetchError> {
//! let aggregator = Aggregator::builder().build()?;
//! let records = aggregator
//!     .aggregate(&[ProfileRequest::new("codechef", "tourist")])
//!     .await;
//! println!("{:?}", records[0].rating);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cache;
pub mod client;
mod error;
pub mod extract;
pub mod platforms;
mod types;

use std::time::Duration;

pub use aggregator::{Aggregator, AggregatorBuilder};
pub use cache::ProfileCache;
pub use client::{Document, DocumentFetcher, FetchOptions};
pub use error::{FetchError, ProfileError};
pub use platforms::{CodeChef, GeeksForGeeks, HackerRank, LeetCode, Platform, PlatformRegistry};
pub use types::{
    FetchRequest, HttpMethod, ProfileRecord, ProfileRequest, StatsQuery, StatsResponse,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ProfileKit/1.0)";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Default lifetime of a cached record
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(120);
