// Chat-completion provider over reqwest
// Author: kelexine (https://github.com/kelexine)

use super::models::{ChatCompletionResponse, ErrorResponse};
use super::{prompt, ProviderError, TranslationProvider};
use crate::config::ProviderConfig;
use crate::error::{BridgeError, Result};
use crate::metrics;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

/// A translation provider speaking the OpenAI `chat/completions` contract.
///
/// Every non-success outcome (transport error, non-2xx status, unparseable
/// body, missing completion) becomes a [`ProviderError`] for the race to
/// aggregate.
pub struct ChatCompletionProvider {
    http_client: Client,
    name: String,
    endpoint: String,
    model: String,
    api_key: Option<Zeroizing<String>>,
    extra_headers: HeaderMap,
}

impl ChatCompletionProvider {
    /// The HTTP client the providers share. `timeout` bounds a single call.
    pub fn http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| BridgeError::Internal(format!("Failed to create HTTP client: {}", e)))
    }

    /// Build a provider sharing an existing HTTP client.
    pub fn with_client(config: &ProviderConfig, http_client: Client) -> Result<Self> {
        let mut extra_headers = HeaderMap::new();
        for (key, value) in &config.extra_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                BridgeError::Config(format!("provider '{}': bad header name {}: {}", config.name, key, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                BridgeError::Config(format!("provider '{}': bad header value for {}: {}", config.name, key, e))
            })?;
            extra_headers.insert(name, value);
        }

        debug!("Configured provider {} -> {}", config.name, config.endpoint);

        Ok(Self {
            http_client,
            name: config.name.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config
                .api_key
                .as_ref()
                .filter(|k| !k.trim().is_empty())
                .map(|k| Zeroizing::new(k.clone())),
            extra_headers,
        })
    }

    /// Pull a human-readable reason out of an error body.
    ///
    /// Prefers `error.message`, then a top-level `message`, then the JSON
    /// body itself; non-JSON bodies are returned as text, and an empty body
    /// falls back to the status reason.
    fn extract_error_message(status: StatusCode, body: &str) -> String {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
            if let Ok(parsed) = serde_json::from_value::<ErrorResponse>(value.clone()) {
                let message = parsed
                    .error
                    .and_then(|e| e.message)
                    .filter(|m| !m.is_empty())
                    .or(parsed.message.filter(|m| !m.is_empty()));
                if let Some(message) = message {
                    return message;
                }
            }
            return value.to_string();
        }

        if !body.trim().is_empty() {
            return body.to_string();
        }

        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    }

    async fn call(&self, text: &str, credential: &str) -> std::result::Result<String, ProviderError> {
        let api_key = self.api_key.as_ref().map(|k| k.as_str()).unwrap_or(credential);
        let request = prompt::build_request(&self.model, text);

        debug!("Calling {} API...", self.name);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .headers(self.extra_headers.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("{} API fetch error: {}", self.name, sanitize(&e.to_string()));
                ProviderError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!("{} API response status: {}", self.name, status);

        let body = response.text().await.map_err(|e| {
            error!("{} API body read error: {}", self.name, e);
            ProviderError::Transport(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            let message = Self::extract_error_message(status, &body);
            error!(
                "{} API error: {} - {}",
                self.name,
                status.as_u16(),
                sanitize(&message)
            );
            return Err(ProviderError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Invalid {} API response: {}", self.name, e);
            ProviderError::InvalidResponse
        })?;

        parsed.first_content().ok_or_else(|| {
            warn!(
                "Invalid {} API response (first 200 chars): {}",
                self.name,
                body.chars().take(200).collect::<String>()
            );
            ProviderError::InvalidResponse
        })
    }
}

#[async_trait]
impl TranslationProvider for ChatCompletionProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, text: &str, credential: &str) -> std::result::Result<String, ProviderError> {
        let start = Instant::now();
        let outcome = self.call(text, credential).await;
        metrics::record_provider_call(&self.name, outcome.is_ok(), start.elapsed().as_secs_f64());
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nested_error_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded","code":429}}"#;
        assert_eq!(
            ChatCompletionProvider::extract_error_message(StatusCode::TOO_MANY_REQUESTS, body),
            "Rate limit exceeded"
        );
    }

    #[test]
    fn test_extract_top_level_message() {
        let body = r#"{"message":"No auth credentials found"}"#;
        assert_eq!(
            ChatCompletionProvider::extract_error_message(StatusCode::UNAUTHORIZED, body),
            "No auth credentials found"
        );
    }

    #[test]
    fn test_empty_messages_fall_through() {
        let body = r#"{"error":{"message":""},"message":"Key revoked"}"#;
        assert_eq!(
            ChatCompletionProvider::extract_error_message(StatusCode::UNAUTHORIZED, body),
            "Key revoked"
        );

        let body = r#"{"error":{"message":""},"message":""}"#;
        assert_eq!(
            ChatCompletionProvider::extract_error_message(StatusCode::UNAUTHORIZED, body),
            body
        );
    }

    #[test]
    fn test_shared_client_builds() {
        let client = ChatCompletionProvider::http_client(Duration::from_secs(5)).unwrap();
        let config = crate::config::AppConfig::default().providers.primary;
        assert!(ChatCompletionProvider::with_client(&config, client).is_ok());
    }

    #[test]
    fn test_extract_falls_back_to_json_then_text_then_reason() {
        let json = ChatCompletionProvider::extract_error_message(StatusCode::BAD_REQUEST, r#"{"detail":"bad"}"#);
        assert_eq!(json, r#"{"detail":"bad"}"#);

        let text = ChatCompletionProvider::extract_error_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(text, "upstream down");

        let reason = ChatCompletionProvider::extract_error_message(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(reason, "Service Unavailable");
    }

    #[test]
    fn test_rejects_bad_header() {
        let mut config = crate::config::AppConfig::default().providers.fallback;
        config.extra_headers.insert("bad header".to_string(), "x".to_string());
        let result = ChatCompletionProvider::with_client(&config, Client::new());
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
