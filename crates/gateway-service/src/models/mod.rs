//! Request and response bodies for the HTTP surface.

use crate::crypto::AccessClaims;
use serde::{Deserialize, Serialize};

/// `GET /` service status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub livekit_configured: bool,
    pub chat_backend: String,
    pub transcription_configured: bool,
    pub environment: String,
}

/// `POST /ai-response` reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    /// The transcribed text when the request carried audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

/// Query for `GET /get-token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenQuery {
    pub identity: Option<String>,
    pub name: Option<String>,
    pub room: Option<String>,
}

/// Issued room token.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub room: String,
    pub identity: String,
    pub expires_in: i64,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .field("url", &self.url)
            .field("room", &self.room)
            .field("identity", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Query for `GET /test-token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestTokenQuery {
    pub identity: Option<String>,
}

/// Diagnostic outcome of `GET /test-token`. Always returned with 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestTokenResponse {
    Issued {
        success: bool,
        token: String,
        identity: String,
        room: String,
        message: String,
    },
    Failed {
        success: bool,
        error: String,
        message: String,
    },
}

/// Body of `POST /verify-token`.
#[derive(Clone, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

/// Successful verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub claims: AccessClaims,
}

/// Body of `POST /create-room`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRoomRequest {
    pub room_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room_name: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room: RoomInfo,
}
