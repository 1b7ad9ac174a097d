// File-backed cache store
// Author: kelexine (https://github.com/kelexine)

use super::models::CacheEntry;
use super::store::CacheStore;
use crate::error::{BridgeError, Result};
use crate::utils::clock::{Clock, SystemClock};
use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

type Document = HashMap<String, CacheEntry>;

/// Persistent cache kept as one JSON document mapping problem id to entry.
///
/// Every operation reads the whole document; writes replace it through a
/// temp file and rename. A process-wide mutex serializes read-modify-write
/// cycles so concurrent `put`s for different keys do not clobber each other.
pub struct FileCacheStore {
    path: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self::with_clock(path, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            ttl,
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, doc: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec(doc)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| BridgeError::Storage(format!("{}: {}", self.path.display(), e)))
    }

    /// Loads the document, treating unreadable storage as empty.
    async fn load_or_empty(&self) -> Document {
        match self.load().await {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Cache at {} unreadable, treating as empty: {}", self.path.display(), e);
                Document::new()
            }
        }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        let now = self.clock.now();
        self.load_or_empty()
            .await
            .remove(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.translated_text)
    }

    async fn put(&self, key: &str, text: &str) {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_or_empty().await;
        doc.insert(key.to_string(), CacheEntry::new(text, self.clock.now()));

        match self.save(&doc).await {
            Ok(()) => debug!("Cached translation for {}", key),
            Err(e) => warn!("Failed to persist cache entry for {}: {}", key, e),
        }
    }

    async fn clear(&self) {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Cache cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear cache at {}: {}", self.path.display(), e),
        }
    }

    async fn prune_expired(&self) -> usize {
        let _guard = self.lock.lock().await;
        let now = self.clock.now();
        let mut doc = self.load_or_empty().await;
        let before = doc.len();
        doc.retain(|_, entry| entry.is_fresh(now, self.ttl));
        let removed = before - doc.len();

        if removed > 0 {
            if let Err(e) = self.save(&doc).await {
                warn!("Failed to persist pruned cache: {}", e);
                return 0;
            }
        }
        removed
    }

    async fn len(&self) -> usize {
        let _guard = self.lock.lock().await;
        self.load_or_empty().await.len()
    }
}
