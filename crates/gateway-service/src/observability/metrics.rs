//! Metrics definitions for the gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gateway_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: 7 values max (GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS)
//! - `endpoint`: known routes plus `/other`
//! - `status`: success, error, timeout
//! - `error_category`: token error reason codes (5 values)
//! - `backend`: gemini, keyword

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Token signing is pure HMAC work, sub-millisecond
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_token_issuance".to_string()),
            &[0.0001, 0.0005, 0.001, 0.002, 0.005, 0.010, 0.050],
        )
        .map_err(|e| format!("Failed to set token issuance buckets: {e}"))?
        // Upstream AI calls are measured in seconds
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_chat_reply".to_string()),
            &[0.050, 0.100, 0.250, 0.500, 1.000, 2.000, 5.000, 10.000, 30.000],
        )
        .map_err(|e| format!("Failed to set chat reply buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("gateway_transcription".to_string()),
            &[0.100, 0.250, 0.500, 1.000, 2.000, 5.000, 10.000, 30.000],
        )
        .map_err(|e| format!("Failed to set transcription buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `gateway_http_requests_total`, `gateway_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status` / `status_code`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("gateway_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("gateway_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Map a request path onto the bounded set of known routes.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/ai-response" => "/ai-response",
        "/get-token" => "/get-token",
        "/test-token" => "/test-token",
        "/verify-token" => "/verify-token",
        "/create-room" => "/create-room",
        _ => "/other",
    }
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record token issuance duration and outcome
///
/// Metric: `gateway_token_issuance_duration_seconds`, `gateway_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str, duration: Duration) {
    histogram!("gateway_token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("gateway_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record token validation result
///
/// Metric: `gateway_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("gateway_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

// ============================================================================
// Upstream Metrics
// ============================================================================

/// Record a chat reply
///
/// Metric: `gateway_chat_reply_duration_seconds`, `gateway_chat_replies_total`
/// Labels: `backend`, `status`
///
/// `status` is `error` when the reply carries an upstream failure message.
pub fn record_chat_reply(backend: &str, status: &str, duration: Duration) {
    histogram!("gateway_chat_reply_duration_seconds", "backend" => backend.to_string(), "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("gateway_chat_replies_total", "backend" => backend.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Record an audio transcription call
///
/// Metric: `gateway_transcription_duration_seconds`, `gateway_transcriptions_total`
/// Labels: `status`
pub fn record_transcription(status: &str, duration: Duration) {
    histogram!("gateway_transcription_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("gateway_transcriptions_total", "status" => status.to_string()).increment(1);
}
