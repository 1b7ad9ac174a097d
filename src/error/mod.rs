// Error types for hinglish-bridge
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Message surfaced when no credential has been configured.
pub const MISSING_API_KEY: &str = "API key not configured. Please set it in extension settings.";

#[derive(Error, Debug)]
pub enum BridgeError {
    /// No credential available. Fatal to the request, surfaced verbatim.
    #[error("{0}")]
    Configuration(String),

    /// Every attempt of the provider race failed. Carries the composed
    /// message from the last attempt.
    #[error("{0}")]
    Exhausted(String),

    /// Caller-imposed deadline elapsed before the orchestrator finished.
    #[error("Translation request timeout")]
    Timeout,

    #[error("Translation already in progress")]
    AlreadyInProgress,

    #[error("Translation is disabled")]
    Disabled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Short machine-readable category used in structured error bodies and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Configuration(_) => "configuration_error",
            BridgeError::Exhausted(_) => "exhausted_error",
            BridgeError::Timeout => "timeout_error",
            BridgeError::AlreadyInProgress => "conflict_error",
            BridgeError::Disabled => "disabled_error",
            BridgeError::InvalidRequest(_) => "invalid_request_error",
            BridgeError::Config(_) | BridgeError::ConfigParsing(_) => "configuration_error",
            _ => "internal_error",
        }
    }
}

// Convert BridgeError to HTTP responses for Axum
impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = match self {
            BridgeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BridgeError::AlreadyInProgress => StatusCode::CONFLICT,
            BridgeError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            BridgeError::Exhausted(_) => StatusCode::BAD_GATEWAY,
            BridgeError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
