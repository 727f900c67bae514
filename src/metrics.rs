//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("mandap_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "mandap_http_request_duration_seconds",
            "HTTP request duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("mandap_errors_total", "Total number of errors by type"),
        &["error_type"]
    ).expect("metric can be created");

    // Auth Metrics
    pub static ref SESSIONS_ACTIVE: IntGauge = IntGauge::new(
        "mandap_sessions_active",
        "Current number of active sessions"
    ).expect("metric can be created");
    pub static ref OAUTH_STATE_ISSUED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("mandap_oauth_state_issued_total", "Total number of OAuth state tokens issued"),
        &["provider"]
    ).expect("metric can be created");
    pub static ref OAUTH_STATE_REJECTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("mandap_oauth_state_rejections_total", "Total number of OAuth state verification rejections"),
        &["reason"]
    ).expect("metric can be created");
    pub static ref OAUTH_EXCHANGE_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("mandap_oauth_exchange_failures_total", "Total number of failed OAuth code/profile exchanges"),
        &["stage"]
    ).expect("metric can be created");
}

/// Register all metrics with the global registry.
///
/// Call once at startup. Registration failures indicate duplicate
/// registration and are logged, not fatal.
pub fn init_metrics() {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()),
        Box::new(ERRORS_TOTAL.clone()),
        Box::new(SESSIONS_ACTIVE.clone()),
        Box::new(OAUTH_STATE_ISSUED_TOTAL.clone()),
        Box::new(OAUTH_STATE_REJECTIONS_TOTAL.clone()),
        Box::new(OAUTH_EXCHANGE_FAILURES_TOTAL.clone()),
    ];

    for metric in metrics {
        if let Err(error) = REGISTRY.register(metric) {
            tracing::warn!(%error, "Failed to register metric");
        }
    }
}

/// Build the metrics router (GET /metrics)
pub fn metrics_router() -> axum::Router {
    use axum::routing::get;

    axum::Router::new().route("/metrics", get(serve_metrics))
}

async fn serve_metrics() -> impl axum::response::IntoResponse {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(%error, "Failed to encode metrics");
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            String::new(),
        );
    }

    (
        axum::http::StatusCode::OK,
        String::from_utf8_lossy(&buffer).into_owned(),
    )
}
