//! Room handler.
//!
//! Rooms are not provisioned server-side; LiveKit creates a room when the
//! first participant joins with a token for it. This route only confirms
//! the name a client should request tokens for.

use crate::errors::GatewayError;
use crate::models::{CreateRoomRequest, CreateRoomResponse, RoomInfo};
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// POST /create-room
///
/// Body is optional: `{"room_name": "..."}`. Without it the configured
/// default room is used.
#[tracing::instrument(skip_all, name = "gateway.rooms.create")]
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateRoomRequest>>,
) -> Result<Json<CreateRoomResponse>, GatewayError> {
    let codec = state
        .codec
        .as_ref()
        .ok_or_else(|| GatewayError::NotConfigured("LiveKit credentials".to_string()))?;

    let room_name = body
        .and_then(|Json(req)| req.room_name)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| codec.default_room().to_string());

    tracing::info!(target: "gateway.rooms", room = %room_name, "Room requested");

    Ok(Json(CreateRoomResponse {
        room: RoomInfo {
            room_name,
            status: "created".to_string(),
            message: "Room is ready; it opens when the first participant joins".to_string(),
        },
    }))
}
