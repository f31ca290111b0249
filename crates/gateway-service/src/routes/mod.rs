//! HTTP routes for the room gateway.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::errors::GatewayError;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::chat::{build_responder, ChatResponder};
use crate::services::token_service::RoomTokenCodec;
use crate::services::transcription::{Transcriber, WhisperTranscriber};
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Request timeout in seconds. Covers a transcription plus a chat reply.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Maximum request body size (audio uploads).
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token codec; `None` when LiveKit credentials are not configured.
    pub codec: Option<RoomTokenCodec>,

    /// Chat strategy selected at startup.
    pub responder: Arc<dyn ChatResponder>,

    /// Speech-to-text client; `None` when transcription is not configured.
    pub transcriber: Option<Arc<dyn Transcriber>>,
}

impl AppState {
    /// Wire the configured integrations.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if an upstream HTTP client cannot be
    /// built.
    pub fn from_config(config: Config) -> Result<Self, GatewayError> {
        let codec = config.livekit.as_ref().map(RoomTokenCodec::from_config);

        let responder =
            build_responder(&config).map_err(|e| GatewayError::Internal(e.to_string()))?;

        let transcriber = match &config.transcription {
            Some(transcription) => {
                let client = WhisperTranscriber::new(transcription)
                    .map_err(|e| GatewayError::Internal(e.to_string()))?;
                Some(Arc::new(client) as Arc<dyn Transcriber>)
            }
            None => None,
        };

        Ok(Self {
            config,
            codec,
            responder,
            transcriber,
        })
    }
}

/// Build the CORS layer from the configured origin allow-list.
///
/// `*` allows any origin. Origins that are not valid header values are
/// skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(target: "gateway.http", origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(allowed))
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Service status
/// - `/health` - Liveness probe (simple "OK")
/// - `/metrics` - Prometheus metrics endpoint
/// - `/ai-response` - Chat prompt, text or audio
/// - `/get-token`, `/test-token`, `/verify-token` - Room tokens
/// - `/create-room` - Room placeholder
/// - CORS allow-list, TraceLayer, 60 second timeout, 20 MiB body limit
/// - HTTP metrics middleware
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    let api_routes = Router::new()
        .route("/", get(handlers::service_status))
        .route("/health", get(handlers::health_check))
        .route("/ai-response", post(handlers::ai_response))
        .route("/get-token", get(handlers::get_token))
        .route("/test-token", get(handlers::test_token))
        .route("/verify-token", post(handlers::verify_token))
        .route("/create-room", post(handlers::create_room))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. Body limit and timeout (innermost)
    // 2. TraceLayer
    // 3. CORS
    // 4. http_metrics_middleware (outermost)
    api_routes
        .merge(metrics_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(http_metrics_middleware))
}
