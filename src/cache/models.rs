//! Cache entry model and expiry rules.

// Author: kelexine (https://github.com/kelexine)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default time-to-live of a cached translation.
pub const DEFAULT_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// A cached translation for one problem identifier.
///
/// Serialized as `{"translation": "...", "timestamp": <ms since epoch>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "translation")]
    pub translated_text: String,

    #[serde(rename = "timestamp", with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(translated_text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            translated_text: translated_text.into(),
            created_at,
        }
    }

    /// An entry is fresh while `now - created_at < ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at < ttl
    }
}

/// Statistics for cache lookups.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
}
