// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::messages::{
    ApiKeyUpdate, EnabledState, RuntimeMessage, TranslateRequest, TranslateResponse,
};
use super::routes::AppState;
use crate::error::{BridgeError, Result};
use crate::metrics;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: String) -> Self {
        Self {
            status: "ok".to_string(),
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            status: "warning".to_string(),
            message,
        }
    }
}

/// Manually deserialize to get better error messages
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        warn!(
            "Failed to deserialize request: {} (first 200 chars: {})",
            e,
            body.chars().take(200).collect::<String>()
        );
        BridgeError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    let settings = state.translator.settings();
    let credential_check = if settings.has_api_key().await {
        HealthCheck::ok("API key configured".to_string())
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck::warning("API key not set".to_string())
    };
    checks.insert("credential".to_string(), credential_check);

    let enabled_check = if settings.enabled().await {
        HealthCheck::ok("Translation enabled".to_string())
    } else {
        HealthCheck::warning("Translation disabled".to_string())
    };
    checks.insert("enabled".to_string(), enabled_check);

    let entries = state.translator.cache().len().await;
    checks.insert(
        "cache".to_string(),
        HealthCheck::ok(format!("{} cached translations", entries)),
    );

    checks.insert(
        "sessions".to_string(),
        HealthCheck::ok(format!("{} translations in flight", state.sessions.pending())),
    );

    let providers = &state.config.providers;
    checks.insert(
        "providers".to_string(),
        HealthCheck::ok(format!(
            "{} ({}) then {} ({})",
            providers.primary.name,
            providers.primary.model,
            providers.fallback.name,
            providers.fallback.model
        )),
    );

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Handler for /v1/messages (runtime-message style envelope)
pub async fn messages_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<TranslateResponse>> {
    let RuntimeMessage::Translate(request) = parse_body::<RuntimeMessage>(&body)?;
    Ok(Json(run_translation(&state, "messages", request).await?))
}

/// Handler for /v1/translate (bare request)
pub async fn translate_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<TranslateResponse>> {
    let request: TranslateRequest = parse_body(&body)?;
    Ok(Json(run_translation(&state, "translate", request).await?))
}

/// Runs one translation under the caller-side deadline.
///
/// The orchestrator runs on its own task. When the deadline passes the task
/// is detached, not aborted: it may still finish and populate the cache, but
/// this caller has already been told the request failed.
async fn run_translation(
    state: &AppState,
    endpoint: &str,
    request: TranslateRequest,
) -> Result<TranslateResponse> {
    let start = Instant::now();

    if request.problem_id.trim().is_empty() {
        return Err(BridgeError::InvalidRequest("problemId must not be empty".to_string()));
    }
    if request.text.trim().is_empty() {
        return Err(BridgeError::InvalidRequest("No problem description provided".to_string()));
    }

    if !state.translator.settings().enabled().await {
        metrics::record_request(endpoint, "rejected", start.elapsed().as_secs_f64());
        return Ok(TranslateResponse::failure(BridgeError::Disabled.to_string()));
    }

    let guard = match request.tab_id.as_deref() {
        Some(tab_id) => match state.sessions.begin(tab_id) {
            Ok(guard) => Some(guard),
            Err(e) => {
                debug!("Rejecting request for busy tab {}", tab_id);
                metrics::record_request(endpoint, "rejected", start.elapsed().as_secs_f64());
                return Ok(TranslateResponse::failure(e.to_string()));
            }
        },
        None => None,
    };

    info!(
        "Received translate request: problem={}, chars={}",
        request.problem_id,
        request.text.len()
    );

    let translator = state.translator.clone();
    let TranslateRequest {
        text, problem_id, ..
    } = request;
    let task = tokio::spawn(async move { translator.translate(&text, &problem_id).await });

    let (response, result_label) = match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(Ok(translation))) => {
            info!(
                "Translation delivered {}",
                if translation.from_cache { "(cached)" } else { "(fresh)" }
            );
            (TranslateResponse::from(translation), "success")
        }
        Ok(Ok(Err(e))) => {
            error!("Translation error: {}", e);
            (TranslateResponse::failure(e.to_string()), "failure")
        }
        Ok(Err(join_error)) => {
            error!("Translation task failed: {}", join_error);
            (
                TranslateResponse::failure(BridgeError::Internal(join_error.to_string()).to_string()),
                "failure",
            )
        }
        Err(_) => {
            warn!("Translation request timed out after {:?}", state.request_timeout);
            (TranslateResponse::failure(BridgeError::Timeout.to_string()), "timeout")
        }
    };

    if let Some(guard) = guard {
        guard.finish(response.success);
    }
    metrics::record_request(endpoint, result_label, start.elapsed().as_secs_f64());

    Ok(response)
}

pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.translator.cache().clear().await;
    metrics::record_cache_clear();
    info!("Translation cache cleared");
    Json(json!({ "success": true }))
}

pub async fn api_key_status_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let configured = state.translator.settings().has_api_key().await;
    Json(json!({ "configured": configured }))
}

pub async fn set_api_key_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>> {
    let update: ApiKeyUpdate = parse_body(&body)?;
    state.translator.settings().set_api_key(&update.api_key).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn clear_api_key_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    state.translator.settings().clear_api_key().await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn get_enabled_handler(State(state): State<AppState>) -> Json<EnabledState> {
    Json(EnabledState {
        enabled: state.translator.settings().enabled().await,
    })
}

pub async fn set_enabled_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<EnabledState>> {
    let update: EnabledState = parse_body(&body)?;
    state.translator.settings().set_enabled(update.enabled).await?;
    Ok(Json(update))
}

pub async fn metrics_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
        .into_response()
}
