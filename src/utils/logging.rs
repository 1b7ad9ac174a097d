//! Structured logging and credential-scrubbing utilities.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps API keys out of log sinks when provider
//! error bodies echo request headers back.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    static ref BEARER: Regex = Regex::new(r"(?i)bearer\s+[^\s'\x22]+").unwrap();
    static ref SECRET_KEY: Regex = Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").unwrap();
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Replaces bearer tokens and `sk-` style API keys with redaction markers.
pub fn sanitize(input: &str) -> String {
    let redacted = BEARER.replace_all(input, "Bearer [REDACTED]");
    SECRET_KEY
        .replace_all(&redacted, "[REDACTED_API_KEY]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bearer() {
        let output = sanitize("Authorization: Bearer abc.def-123 rejected");
        assert_eq!(output, "Authorization: Bearer [REDACTED] rejected");
    }

    #[test]
    fn test_sanitize_api_key() {
        let output = sanitize("invalid key sk-or-v1-aef932f4278cbd7f supplied");
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("aef932f4278cbd7f"));
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("rate limited"), "rate limited");
    }
}
