// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{BridgeError, Result};
use config::{Config, Environment, File};
use std::path::Path;

/// Upper bound on the retry base delay (one hour).
pub const MAX_RETRY_BASE_DELAY_MS: u64 = 60 * 60 * 1000;

impl CacheConfig {
    /// The entry time-to-live. Zero and values chrono cannot represent are rejected.
    pub fn ttl(&self) -> Result<chrono::Duration> {
        i64::try_from(self.ttl_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                BridgeError::Config(format!(
                    "cache.ttl_seconds must be positive and representable, got {}",
                    self.ttl_seconds
                ))
            })
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file (`path`, or `~/.hinglish-bridge/config.toml`)
    /// 3. Defaults (lowest)
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            // An explicitly requested file must exist
            Some(p) => File::from(p).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // Override with environment variables (prefix: HINGLISH_BRIDGE_, nesting: __)
            .add_source(
                Environment::with_prefix("HINGLISH_BRIDGE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| BridgeError::Config(e.to_string()))?;

        let app: AppConfig = config
            .try_deserialize()
            .map_err(|e| BridgeError::Config(e.to_string()))?;

        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<()> {
        if self.translation.max_attempts == 0 {
            return Err(BridgeError::Config(
                "translation.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.translation.request_timeout_seconds == 0 {
            return Err(BridgeError::Config(
                "translation.request_timeout_seconds must be positive".to_string(),
            ));
        }
        if self.translation.retry_base_delay_ms > MAX_RETRY_BASE_DELAY_MS {
            return Err(BridgeError::Config(format!(
                "translation.retry_base_delay_ms must be at most {}",
                MAX_RETRY_BASE_DELAY_MS
            )));
        }
        self.cache.ttl()?;
        for provider in [&self.providers.primary, &self.providers.fallback] {
            if provider.endpoint.trim().is_empty() {
                return Err(BridgeError::Config(format!(
                    "provider '{}' has no endpoint",
                    provider.name
                )));
            }
        }
        Ok(())
    }

    fn default_config_path() -> String {
        models::data_dir()
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
