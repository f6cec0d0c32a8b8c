//! Short-lived record cache
//!
//! Keyed by normalized (platform, username). Entries older than the TTL are
//! treated as missing and removed on the next lookup or purge; long-running
//! owners call [`ProfileCache::spawn_purger`] so unvisited keys do not pile up.

use crate::types::{ProfileRecord, ProfileRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Purge period used when a zero period is requested
const FALLBACK_PURGE_PERIOD: Duration = Duration::from_secs(1);

/// In-memory cache of successful profile records
#[derive(Debug)]
pub struct ProfileCache {
    ttl: Duration,
    entries: RwLock<HashMap<ProfileRequest, (ProfileRecord, Instant)>>,
}

impl ProfileCache {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh record
    pub async fn get(&self, key: &ProfileRequest) -> Option<ProfileRecord> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((record, stored)) if stored.elapsed() < self.ttl => {
                    trace!(platform = %key.platform, username = %key.username, "Cache hit");
                    return Some(record.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if let Some((_, stored)) = entries.get(key) {
            if stored.elapsed() >= self.ttl {
                entries.remove(key);
            }
        }
        None
    }

    /// Store a record
    ///
    /// Records carrying an error are not cached.
    pub async fn set(&self, key: ProfileRequest, record: ProfileRecord) {
        if record.error.is_some() {
            return;
        }
        self.entries
            .write()
            .await
            .insert(key, (record, Instant::now()));
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, (_, stored)| stored.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Purge expired entries every `period` in a background task
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped.
    pub fn spawn_purger(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let period = if period.is_zero() {
            FALLBACK_PURGE_PERIOD
        } else {
            period
        };
        let cache = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(live) = cache.upgrade() else {
                    break;
                };
                let removed = live.purge_expired().await;
                if removed > 0 {
                    debug!(removed, "Purged expired cache entries");
                }
            }
        })
    }

    /// Number of stored entries, including expired ones not yet purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(platform: &str, username: &str) -> ProfileRecord {
        ProfileRecord {
            total_solved: Some(10),
            ..ProfileRecord::new(platform, username)
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        let key = ProfileRequest::new("leetcode", "alice");

        assert!(cache.get(&key).await.is_none());
        cache.set(key.clone(), record("leetcode", "alice")).await;

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached.total_solved, Some(10));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_key_is_normalized() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache
            .set(
                ProfileRequest::new("LeetCode", " alice "),
                record("leetcode", "alice"),
            )
            .await;

        assert!(cache
            .get(&ProfileRequest::new("leetcode", "alice"))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_failed_records_not_cached() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        let key = ProfileRequest::new("topcoder", "alice");

        cache
            .set(
                key.clone(),
                ProfileRecord::failed("topcoder", "alice", "unsupported platform"),
            )
            .await;

        assert!(cache.get(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = ProfileCache::new(Duration::from_millis(20));
        let key = ProfileRequest::new("gfg", "bob");
        cache.set(key.clone(), record("gfg", "bob")).await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get(&key).await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let cache = ProfileCache::new(Duration::from_millis(20));
        cache
            .set(ProfileRequest::new("gfg", "bob"), record("gfg", "bob"))
            .await;
        cache
            .set(ProfileRequest::new("gfg", "eve"), record("gfg", "eve"))
            .await;

        assert_eq!(cache.purge_expired().await, 0);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_purger_removes_unvisited_entries() {
        let cache = Arc::new(ProfileCache::new(Duration::from_millis(20)));
        let _purger = cache.spawn_purger(Duration::from_millis(10));
        cache
            .set(ProfileRequest::new("gfg", "bob"), record("gfg", "bob"))
            .await;
        assert_eq!(cache.len().await, 1);

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_purger_stops_with_cache() {
        let cache = Arc::new(ProfileCache::new(Duration::from_millis(20)));
        let purger = cache.spawn_purger(Duration::from_millis(10));

        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), purger)
            .await
            .unwrap()
            .unwrap();
    }
}
