// Translation cache module
// Author: kelexine (https://github.com/kelexine)

pub mod file;
pub mod models;
pub mod store;

pub use file::FileCacheStore;
pub use models::{CacheEntry, CacheStats, DEFAULT_TTL_SECONDS};
pub use store::{CacheStore, MemoryCacheStore};

use crate::config::CacheConfig;
use crate::error::Result;
use std::sync::Arc;

/// Builds the configured store: file-backed, or in-memory when `ephemeral`.
pub fn from_config(config: &CacheConfig, ephemeral: bool) -> Result<Arc<dyn CacheStore>> {
    let ttl = config.ttl()?;
    Ok(if ephemeral {
        Arc::new(MemoryCacheStore::new(ttl))
    } else {
        Arc::new(FileCacheStore::new(&config.path, ttl))
    })
}
