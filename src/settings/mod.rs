//! User settings: the provider credential and the enabled toggle.
//!
//! The credential is the only secret the service handles. It is read from
//! the settings document (or the `HINGLISH_BRIDGE_API_KEY` override), held in
//! a zeroizing buffer, and never logged or echoed back over HTTP.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Environment variable that takes precedence over the stored credential.
pub const API_KEY_ENV: &str = "HINGLISH_BRIDGE_API_KEY";

/// On-disk settings document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    extension_enabled: Option<bool>,
}

enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<SettingsDocument>>),
}

/// Settings persistence with async get/set semantics.
pub struct SettingsStore {
    backend: Backend,
    env_override: Option<Zeroizing<String>>,
    // Serializes read-modify-write cycles on the file backend
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
            env_override: None,
            lock: Mutex::new(()),
        }
    }

    /// In-memory settings, optionally seeded with a credential.
    pub fn in_memory(api_key: Option<&str>) -> Self {
        let doc = SettingsDocument {
            api_key: api_key.map(str::to_string),
            extension_enabled: None,
        };
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(doc))),
            env_override: None,
            lock: Mutex::new(()),
        }
    }

    /// Picks up [`API_KEY_ENV`] if it is set and non-empty.
    pub fn with_env_override(mut self) -> Self {
        self.env_override = std::env::var(API_KEY_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Zeroizing::new);
        self
    }

    async fn load(&self) -> Result<SettingsDocument> {
        match &self.backend {
            Backend::Memory(doc) => Ok(doc.lock().await.clone()),
            Backend::File(path) => match tokio::fs::read(path).await {
                Ok(bytes) if bytes.is_empty() => Ok(SettingsDocument::default()),
                Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Ok(SettingsDocument::default())
                }
                Err(e) => Err(e.into()),
            },
        }
    }

    async fn save(&self, doc: &SettingsDocument) -> Result<()> {
        match &self.backend {
            Backend::Memory(shared) => {
                *shared.lock().await = doc.clone();
                Ok(())
            }
            Backend::File(path) => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let bytes = Zeroizing::new(serde_json::to_vec_pretty(doc)?);
                let tmp = path.with_extension("json.tmp");
                write_private(&tmp, &bytes).await?;
                tokio::fs::rename(&tmp, path)
                    .await
                    .map_err(|e| BridgeError::Storage(format!("{}: {}", path.display(), e)))
            }
        }
    }

    async fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SettingsDocument),
    {
        let _guard = self.lock.lock().await;
        // An unreadable document is left alone rather than replaced with defaults
        let mut doc = self.load().await.map_err(|e| {
            warn!("Settings unreadable, refusing to overwrite: {}", e);
            BridgeError::Storage(format!("settings unreadable: {}", e))
        })?;
        f(&mut doc);
        self.save(&doc).await
    }

    /// The configured credential, if any.
    pub async fn api_key(&self) -> Option<Zeroizing<String>> {
        if let Some(key) = &self.env_override {
            return Some(key.clone());
        }

        match self.load().await {
            Ok(doc) => doc
                .api_key
                .filter(|k| !k.trim().is_empty())
                .map(Zeroizing::new),
            Err(e) => {
                warn!("Failed to read settings: {}", e);
                None
            }
        }
    }

    pub async fn has_api_key(&self) -> bool {
        self.api_key().await.is_some()
    }

    /// Stores a trimmed credential. Blank input is rejected.
    pub async fn set_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(BridgeError::InvalidRequest(
                "Please enter an API key".to_string(),
            ));
        }
        let key = key.to_string();
        self.update(move |doc| doc.api_key = Some(key)).await?;
        debug!("API key saved");
        Ok(())
    }

    pub async fn clear_api_key(&self) -> Result<()> {
        self.update(|doc| doc.api_key = None).await?;
        debug!("API key cleared");
        Ok(())
    }

    /// Whether translation is enabled. Defaults to `true` when unset or unreadable.
    pub async fn enabled(&self) -> bool {
        match self.load().await {
            Ok(doc) => doc.extension_enabled.unwrap_or(true),
            Err(e) => {
                warn!("Failed to read settings: {}", e);
                true
            }
        }
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|doc| doc.extension_enabled = Some(enabled)).await?;
        debug!("Translation {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }
}

/// Writes `bytes` to `path` readable by the owner only.
async fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;

    // An existing file keeps its old mode through open(), so tighten it explicitly
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }
    Ok(())
}
