//! Configuration data structures for hinglish-bridge.
//!
//! This module defines the schema for the application settings: the local
//! HTTP server, the two chat-completion providers, the retry/timeout policy
//! of the translation flow, and the on-disk stores.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion providers, in priority order.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Retry and timeout policy for translation requests.
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Translation cache location and expiry.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Settings store location.
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8787`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads for the Tokio runtime.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// The primary and fallback providers raced on every attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_primary")]
    pub primary: ProviderConfig,

    #[serde(default = "default_fallback")]
    pub fallback: ProviderConfig,
}

/// A single OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Display name used in logs and error messages.
    pub name: String,

    /// Full URL of the `chat/completions` endpoint.
    pub endpoint: String,

    /// Model identifier sent in the request body.
    pub model: String,

    /// Provider-specific key. When unset the user credential from the
    /// settings store is used.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Extra headers sent with every request (e.g. attribution headers).
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
}

/// Retry and timeout policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Number of race attempts before giving up.
    /// Default: `3`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff unit; attempt `n` waits `n * base` before the next one.
    /// Default: `2000`
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Caller-side deadline wrapping the whole request/response cycle.
    /// Default: `60`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Per-request timeout for a single provider HTTP call.
    /// Default: `50`
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

/// Translation cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// JSON file backing the cache.
    /// Default: `~/.hinglish-bridge/translation_cache.json`
    #[serde(default = "default_cache_path")]
    pub path: String,

    /// Time-to-live of a cached translation.
    /// Default: `604800` (7 days)
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,

    /// Remove expired entries once when the server starts.
    /// Default: `false`
    #[serde(default)]
    pub prune_on_startup: bool,
}

/// Settings store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// JSON file holding the credential and the enabled flag.
    /// Default: `~/.hinglish-bridge/settings.json`
    #[serde(default = "default_settings_path")]
    pub path: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            fallback: default_fallback(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            request_timeout_seconds: default_request_timeout(),
            http_timeout_seconds: default_http_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            ttl_seconds: default_cache_ttl(),
            prune_on_startup: false,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_primary() -> ProviderConfig {
    ProviderConfig {
        name: "Routeway".to_string(),
        endpoint: "https://api.routeway.ai/v1/chat/completions".to_string(),
        model: "deepseek-v3.1-terminus:free".to_string(),
        api_key: None,
        extra_headers: HashMap::new(),
    }
}

fn default_fallback() -> ProviderConfig {
    let mut extra_headers = HashMap::new();
    extra_headers.insert("HTTP-Referer".to_string(), "https://leetcode.com".to_string());
    extra_headers.insert("X-Title".to_string(), "LeetCode Hinglish Translator".to_string());

    ProviderConfig {
        name: "OpenRouter".to_string(),
        endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
        model: "deepseek/deepseek-r1-0528:free".to_string(),
        api_key: None,
        extra_headers,
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    60
}

fn default_http_timeout() -> u64 {
    50
}

pub(crate) fn data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".hinglish-bridge")
}

fn default_cache_path() -> String {
    data_dir()
        .join("translation_cache.json")
        .to_string_lossy()
        .to_string()
}

fn default_cache_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_settings_path() -> String {
    data_dir()
        .join("settings.json")
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
