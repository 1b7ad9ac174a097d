// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    api_key_status_handler, clear_api_key_handler, clear_cache_handler, get_enabled_handler,
    health_handler, messages_handler, metrics_handler, set_api_key_handler, set_enabled_handler,
    translate_handler,
};
use crate::config::AppConfig;
use crate::session::SessionRegistry;
use crate::translation::Translator;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub translator: Arc<Translator>,
    pub sessions: SessionRegistry,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: AppConfig, translator: Arc<Translator>) -> Self {
        let request_timeout = Duration::from_secs(config.translation.request_timeout_seconds);
        Self {
            config,
            translator,
            sessions: SessionRegistry::new(),
            request_timeout,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/messages", post(messages_handler))
        .route("/v1/translate", post(translate_handler))
        .route("/v1/cache", delete(clear_cache_handler))
        .route(
            "/v1/settings/api-key",
            get(api_key_status_handler)
                .put(set_api_key_handler)
                .delete(clear_api_key_handler),
        )
        .route(
            "/v1/settings/enabled",
            get(get_enabled_handler).put(set_enabled_handler),
        )
        // Problem statements are small; 2MB leaves room for embedded markup
        .layer(tower_http::limit::RequestBodyLimitLayer::new(2 * 1024 * 1024))
        // The page script calls from an extension origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Tag every request with an x-request-id and echo it back
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
