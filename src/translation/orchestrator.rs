// Translation orchestrator: cache, race, retry, persist
// Author: kelexine (https://github.com/kelexine)

use super::race;
use crate::cache::{CacheStats, CacheStore};
use crate::config::{AppConfig, TranslationConfig};
use crate::error::{BridgeError, Result, MISSING_API_KEY};
use crate::metrics;
use crate::providers::{ChatCompletionProvider, TranslationProvider};
use crate::settings::SettingsStore;
use crate::utils::retry::LinearBackoff;
use backoff::backoff::Backoff;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A translated problem description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub text: String,
    pub from_cache: bool,
}

/// How many race attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&TranslationConfig> for RetryPolicy {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }
}

/// Stateless, reentrant translation flow.
///
/// Cache lookup first; on a miss both providers are raced up to
/// `max_attempts` times with linear backoff, and the winning text is
/// written back under the problem id. Provider failures stay inside: only
/// [`BridgeError::Configuration`] and [`BridgeError::Exhausted`] come out.
pub struct Translator {
    cache: Arc<dyn CacheStore>,
    settings: Arc<SettingsStore>,
    primary: Arc<dyn TranslationProvider>,
    fallback: Arc<dyn TranslationProvider>,
    policy: RetryPolicy,
    stats: Mutex<CacheStats>,
}

impl Translator {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        settings: Arc<SettingsStore>,
        primary: Arc<dyn TranslationProvider>,
        fallback: Arc<dyn TranslationProvider>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            cache,
            settings,
            primary,
            fallback,
            policy,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Wire up the configured chat-completion providers over one shared HTTP client.
    pub fn from_config(
        config: &AppConfig,
        cache: Arc<dyn CacheStore>,
        settings: Arc<SettingsStore>,
    ) -> Result<Self> {
        let http_client = ChatCompletionProvider::http_client(Duration::from_secs(
            config.translation.http_timeout_seconds,
        ))?;

        let primary = ChatCompletionProvider::with_client(&config.providers.primary, http_client.clone())?;
        let fallback = ChatCompletionProvider::with_client(&config.providers.fallback, http_client)?;

        Ok(Self::new(
            cache,
            settings,
            Arc::new(primary),
            Arc::new(fallback),
            RetryPolicy::from(&config.translation),
        ))
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Cache hit/miss/write counters since construction.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    /// Translate `raw_text` for `problem_id`.
    pub async fn translate(&self, raw_text: &str, problem_id: &str) -> Result<Translation> {
        if let Some(text) = self.cache.get(problem_id).await {
            debug!("Cache hit for {}", problem_id);
            self.stats.lock().hits += 1;
            metrics::record_cache_hit();
            metrics::record_translation("cache", true, 0);
            return Ok(Translation {
                text,
                from_cache: true,
            });
        }

        self.stats.lock().misses += 1;
        metrics::record_cache_miss();

        let credential = match self.settings.api_key().await {
            Some(key) => key,
            None => {
                metrics::record_translation("none", false, 0);
                return Err(BridgeError::Configuration(MISSING_API_KEY.to_string()));
            }
        };

        let mut backoff = LinearBackoff::new(self.policy.base_delay, self.policy.max_attempts);

        loop {
            let attempt = backoff.attempts() + 1;
            info!(
                "Translation attempt {}/{} for {}: {} vs {}",
                attempt,
                self.policy.max_attempts,
                problem_id,
                self.primary.name(),
                self.fallback.name()
            );

            let results = race::run(
                self.primary.as_ref(),
                self.fallback.as_ref(),
                raw_text,
                credential.as_str(),
            )
            .await;

            match race::select(results) {
                Ok(winner) => {
                    info!("{} won the race on attempt {}", winner.provider, attempt);
                    self.cache.put(problem_id, &winner.text).await;
                    self.stats.lock().writes += 1;
                    metrics::record_cache_write();
                    metrics::record_translation("provider", true, attempt);
                    return Ok(Translation {
                        text: winner.text,
                        from_cache: false,
                    });
                }
                Err(reasons) => {
                    warn!("Attempt {} failed: {}", attempt, reasons);
                    match backoff.next_backoff() {
                        Some(delay) => {
                            debug!("Waiting {}ms before retry", delay.as_millis());
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            metrics::record_translation("provider", false, attempt);
                            return Err(BridgeError::Exhausted(format!(
                                "All APIs failed: {}",
                                reasons
                            )));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::providers::ProviderError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays scripted outcomes, one per call; repeats the last when drained.
    struct Scripted {
        name: &'static str,
        script: Mutex<VecDeque<std::result::Result<String, ProviderError>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, script: Vec<std::result::Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn translate(&self, _text: &str, _credential: &str) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        }
    }

    fn down(provider: &str) -> std::result::Result<String, ProviderError> {
        Err(ProviderError::Status {
            provider: provider.to_string(),
            status: 503,
            message: "overloaded".to_string(),
        })
    }

    fn translator(
        primary: Arc<Scripted>,
        fallback: Arc<Scripted>,
        api_key: Option<&str>,
    ) -> Translator {
        Translator::new(
            Arc::new(MemoryCacheStore::new(chrono::Duration::days(7))),
            Arc::new(SettingsStore::in_memory(api_key)),
            primary,
            fallback,
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_primary_wins_when_both_succeed() {
        let primary = Scripted::new("Routeway", vec![Ok("primary".to_string())]);
        let fallback = Scripted::new("OpenRouter", vec![Ok("fallback".to_string())]);
        let t = translator(primary.clone(), fallback.clone(), Some("key"));

        let result = t.translate("text", "two-sum").await.unwrap();
        assert_eq!(result.text, "primary");
        assert!(!result.from_cache);
        // Both are dispatched even though the primary succeeded
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let primary = Scripted::new("Routeway", vec![Ok("primary".to_string())]);
        let fallback = Scripted::new("OpenRouter", vec![down("OpenRouter")]);
        let t = translator(primary.clone(), fallback.clone(), Some("key"));

        t.translate("text", "two-sum").await.unwrap();
        let again = t.translate("text", "two-sum").await.unwrap();

        assert!(again.from_cache);
        assert_eq!(again.text, "primary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(t.stats(), CacheStats { hits: 1, misses: 1, writes: 1 });
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let primary = Scripted::new("Routeway", vec![Ok("x".to_string())]);
        let fallback = Scripted::new("OpenRouter", vec![Ok("y".to_string())]);
        let t = translator(primary.clone(), fallback, None);

        let err = t.translate("text", "two-sum").await.unwrap_err();
        assert!(matches!(err, BridgeError::Configuration(_)));
        assert_eq!(err.to_string(), MISSING_API_KEY);
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_needs_no_credential() {
        let primary = Scripted::new("Routeway", vec![Ok("x".to_string())]);
        let fallback = Scripted::new("OpenRouter", vec![Ok("y".to_string())]);
        let t = translator(primary.clone(), fallback, None);
        t.cache().put("two-sum", "<p>pehle se</p>").await;

        let result = t.translate("text", "two-sum").await.unwrap();
        assert!(result.from_cache);
        assert_eq!(result.text, "<p>pehle se</p>");
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_between_attempts() {
        let primary = Scripted::new(
            "Routeway",
            vec![down("Routeway"), down("Routeway"), Ok("third time".to_string())],
        );
        let fallback = Scripted::new("OpenRouter", vec![down("OpenRouter")]);
        let t = translator(primary.clone(), fallback.clone(), Some("key"));

        let start = tokio::time::Instant::now();
        let result = t.translate("text", "two-sum").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(result.text, "third time");
        assert!(!result.from_cache);
        assert_eq!(primary.calls(), 3);
        assert_eq!(fallback.calls(), 3);
        // 2s after attempt 1, 4s after attempt 2
        assert!(elapsed >= Duration::from_millis(6000));
        assert!(elapsed < Duration::from_millis(6100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_both_providers() {
        let primary = Scripted::new("Routeway", vec![down("Routeway")]);
        let fallback = Scripted::new("OpenRouter", vec![Err(ProviderError::InvalidResponse)]);
        let t = translator(primary.clone(), fallback, Some("key"));

        let err = t.translate("text", "two-sum").await.unwrap_err();
        let message = err.to_string();

        assert!(matches!(err, BridgeError::Exhausted(_)));
        assert!(message.starts_with("All APIs failed: "));
        assert!(message.contains("Routeway: Routeway API error (503): overloaded"));
        assert!(message.contains("OpenRouter: Invalid API response format"));
        assert_eq!(primary.calls(), 3);
        assert!(t.cache().get("two-sum").await.is_none());
    }
}
