// Metrics module for Prometheus observability
// Author: kelexine (https://github.com/kelexine)

mod registry;

pub use registry::{
    gather_metrics,
    CACHE_OPERATIONS,
    PROVIDER_CALLS,
    PROVIDER_DURATION,
    RACE_ATTEMPTS,
    REQUESTS_TOTAL,
    REQUEST_DURATION,
    TRANSLATIONS_TOTAL,
};

fn outcome(success: bool) -> &'static str {
    if success { "success" } else { "failure" }
}

/// Helper to record translate request metrics
pub fn record_request(endpoint: &str, result: &str, duration_secs: f64) {
    REQUESTS_TOTAL.with_label_values(&[endpoint, result]).inc();
    REQUEST_DURATION
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Helper to record a single provider call
pub fn record_provider_call(provider: &str, success: bool, duration_secs: f64) {
    PROVIDER_CALLS
        .with_label_values(&[provider, outcome(success)])
        .inc();
    PROVIDER_DURATION
        .with_label_values(&[provider])
        .observe(duration_secs);
}

/// Helper to record a finished orchestration
pub fn record_translation(source: &str, success: bool, attempts: u32) {
    TRANSLATIONS_TOTAL
        .with_label_values(&[source, outcome(success)])
        .inc();
    if attempts > 0 {
        RACE_ATTEMPTS
            .with_label_values(&[outcome(success)])
            .observe(attempts as f64);
    }
}

/// Helper to record translation cache operations
pub fn record_cache_hit() {
    CACHE_OPERATIONS.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    CACHE_OPERATIONS.with_label_values(&["miss"]).inc();
}

pub fn record_cache_write() {
    CACHE_OPERATIONS.with_label_values(&["write"]).inc();
}

pub fn record_cache_clear() {
    CACHE_OPERATIONS.with_label_values(&["clear"]).inc();
}
