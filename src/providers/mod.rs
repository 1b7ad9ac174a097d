//! Translation providers.
//!
//! A provider turns raw problem text into translated HTML with a single
//! HTTP call. Providers are interchangeable: the orchestrator races a
//! primary and a fallback and only looks at whether each one succeeded.
//!
//! # Submodules
//!
//! - `chat`: OpenAI-compatible `chat/completions` client.
//! - `models`: Request/response wire types.
//! - `prompt`: The fixed translation instruction and sampling parameters.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod chat;
pub mod models;
pub mod prompt;

pub use chat::ChatCompletionProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Why a single provider call failed. Recoverable: these are aggregated by
/// the race and never returned from the orchestrator on their own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider} API error ({status}): {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Invalid API response format")]
    InvalidResponse,

    #[error("{0}")]
    Transport(String),
}

/// A single translation backend.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Identity used to tag results and compose error messages.
    fn name(&self) -> &str;

    /// Translate `text`. `credential` is the user's key; providers with their
    /// own configured key may ignore it.
    async fn translate(&self, text: &str, credential: &str) -> Result<String, ProviderError>;
}

/// Outcome of one provider within one race attempt, tagged with its source.
#[derive(Debug, Clone)]
pub struct ProviderResult {
    pub provider: String,
    pub outcome: Result<String, ProviderError>,
}

impl ProviderResult {
    /// `"<provider>: <reason>"` for failures, `None` for successes.
    pub fn failure_reason(&self) -> Option<String> {
        self.outcome
            .as_ref()
            .err()
            .map(|e| format!("{}: {}", self.provider, e))
    }
}
