// Cache store contract and in-memory backend
// Author: kelexine (https://github.com/kelexine)

use super::models::CacheEntry;
use crate::utils::clock::{Clock, SystemClock};
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Key-value persistence for translations, keyed by problem identifier.
///
/// Storage failures never surface: a failed read is a miss and a failed
/// write is dropped after logging. Expired entries are masked by `get` but
/// stay stored until [`CacheStore::prune_expired`] runs.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached text if present and younger than the TTL.
    async fn get(&self, key: &str) -> Option<String>;

    /// Upserts `text` under `key`, stamped with the current time.
    async fn put(&self, key: &str, text: &str);

    /// Removes every entry.
    async fn clear(&self);

    /// Removes expired entries and returns how many were dropped.
    async fn prune_expired(&self) -> usize;

    /// Number of stored entries, expired ones included.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Process-local cache backend.
#[derive(Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock,
        }
    }

    /// Raw entry access, expired or not.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.translated_text.clone())
    }

    async fn put(&self, key: &str, text: &str) {
        let entry = CacheEntry::new(text, self.clock.now());
        self.entries.write().await.insert(key.to_string(), entry);
        debug!("Cached translation for {}", key);
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
        debug!("Cache cleared");
    }

    async fn prune_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now, self.ttl));
        before - entries.len()
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    fn store() -> (MemoryCacheStore, ManualClock) {
        let clock = ManualClock::default();
        let store = MemoryCacheStore::with_clock(Duration::days(7), Arc::new(clock.clone()));
        (store, clock)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let (store, _) = store();
        store.put("two-sum", "<p>do numbers</p>").await;
        assert_eq!(store.get("two-sum").await.as_deref(), Some("<p>do numbers</p>"));
        assert_eq!(store.get("three-sum").await, None);
    }

    #[tokio::test]
    async fn test_expired_entry_masked_not_deleted() {
        let (store, clock) = store();
        store.put("two-sum", "old").await;
        clock.advance(Duration::days(8));

        assert_eq!(store.get("two-sum").await, None);
        assert_eq!(store.len().await, 1);
        assert!(store.entry("two-sum").await.is_some());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let (store, _) = store();
        store.put("k", "first").await;
        store.put("k", "second").await;
        assert_eq!(store.get("k").await.as_deref(), Some("second"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_prune_and_clear() {
        let (store, clock) = store();
        store.put("old", "a").await;
        clock.advance(Duration::days(8));
        store.put("new", "b").await;

        assert_eq!(store.prune_expired().await, 1);
        assert_eq!(store.len().await, 1);

        store.clear().await;
        assert!(store.is_empty().await);
    }
}
