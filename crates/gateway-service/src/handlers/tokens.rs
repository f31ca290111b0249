//! Room token handlers.
//!
//! Issue, diagnose and verify LiveKit room access tokens. All three routes
//! need LiveKit credentials; without them they report "not configured".

use crate::errors::GatewayError;
use crate::models::{
    TestTokenQuery, TestTokenResponse, TokenQuery, TokenResponse, VerifyTokenRequest,
    VerifyTokenResponse,
};
use crate::routes::AppState;
use crate::services::token_service::RoomTokenCodec;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Identity used by `GET /test-token` when none is given.
pub const TEST_TOKEN_IDENTITY: &str = "test-user";

const LIVEKIT_CREDENTIALS: &str = "LiveKit credentials";

/// Trim a query value, treating blank as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_codec(state: &AppState) -> Result<&RoomTokenCodec, GatewayError> {
    state
        .codec
        .as_ref()
        .ok_or_else(|| GatewayError::NotConfigured(LIVEKIT_CREDENTIALS.to_string()))
}

/// Issue a room token.
///
/// GET /get-token?identity=&name=&room=
///
/// `room` defaults to the configured room; `name` is an optional display name.
#[instrument(skip_all, name = "gateway.tokens.get")]
pub async fn get_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, GatewayError> {
    let identity = non_blank(query.identity.as_deref())
        .ok_or_else(|| GatewayError::BadRequest("identity is required".to_string()))?;

    let codec = require_codec(&state)?;
    let room = non_blank(query.room.as_deref()).unwrap_or(codec.default_room());
    let name = non_blank(query.name.as_deref());

    let token = codec.issue_for_room(room, identity, name)?;

    Ok(Json(TokenResponse {
        token,
        url: state.config.livekit.as_ref().and_then(|l| l.url.clone()),
        room: room.to_string(),
        identity: identity.to_string(),
        expires_in: codec.ttl_seconds(),
    }))
}

/// Diagnostic token issuance.
///
/// GET /test-token?identity=
///
/// Always answers 200; failures are described in the body.
#[instrument(skip_all, name = "gateway.tokens.test")]
pub async fn test_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TestTokenQuery>,
) -> Json<TestTokenResponse> {
    let identity = non_blank(query.identity.as_deref()).unwrap_or(TEST_TOKEN_IDENTITY);

    let Some(codec) = state.codec.as_ref() else {
        return Json(TestTokenResponse::Failed {
            success: false,
            error: "NOT_CONFIGURED".to_string(),
            message: "Set LIVEKIT_API_KEY and LIVEKIT_API_SECRET to enable token generation"
                .to_string(),
        });
    };

    match codec.issue(identity, None) {
        Ok(token) => Json(TestTokenResponse::Issued {
            success: true,
            token,
            identity: identity.to_string(),
            room: codec.default_room().to_string(),
            message: "Token generated successfully".to_string(),
        }),
        Err(e) => {
            tracing::warn!(target: "gateway.tokens", error = %e, "Test token generation failed");
            Json(TestTokenResponse::Failed {
                success: false,
                error: e.reason_code().to_string(),
                message: "Token generation failed".to_string(),
            })
        }
    }
}

/// Verify a token and return its claims.
///
/// POST /verify-token
///
/// # Errors
///
/// - 400 if the body is not `{"token": "..."}`
/// - 401 with the failure reason code when the token does not verify
#[instrument(skip_all, name = "gateway.tokens.verify")]
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    body: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> Result<Json<VerifyTokenResponse>, GatewayError> {
    let Json(request) = body.map_err(|e| GatewayError::BadRequest(e.body_text()))?;
    let codec = require_codec(&state)?;
    let claims = codec.validate(&request.token)?;

    Ok(Json(VerifyTokenResponse {
        valid: true,
        claims,
    }))
}
