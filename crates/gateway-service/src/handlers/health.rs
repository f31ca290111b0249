//! Liveness and status handlers.
//!
//! - `/health`: liveness probe, returns OK if the process is running
//! - `/`: service status, reports which integrations are configured

use crate::models::StatusResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// Liveness probe handler.
///
/// Does NOT check any dependencies; failure means the process is hung.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Service status handler.
///
/// Reports configuration presence only. Never includes credentials.
#[tracing::instrument(skip_all, name = "gateway.status")]
pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        livekit_configured: state.codec.is_some(),
        chat_backend: state.responder.backend().as_str().to_string(),
        transcription_configured: state.transcriber.is_some(),
        environment: state.config.environment.clone(),
    })
}
