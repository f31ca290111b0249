//! Gateway error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl. Messages
//! returned to clients are generic; the underlying cause is logged
//! server-side.

use crate::crypto::TokenError;
use crate::services::transcription::TranscriptionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Gateway error type.
///
/// Maps to HTTP status codes:
/// - BadRequest: 400
/// - InvalidToken: 401
/// - NotConfigured, Internal: 500
/// - Upstream: 502
/// - ServiceUnavailable: 503
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid token: {0}")]
    InvalidToken(TokenError),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            GatewayError::NotConfigured(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<TokenError> for GatewayError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::SigningError(reason) => GatewayError::Internal(reason),
            other => GatewayError::InvalidToken(other),
        }
    }
}

impl From<TranscriptionError> for GatewayError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::InvalidRequest(reason) => {
                GatewayError::BadRequest(format!("Unusable audio upload: {}", reason))
            }
            other => GatewayError::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            GatewayError::BadRequest(reason) => ("BAD_REQUEST", reason.clone()),
            GatewayError::InvalidToken(err) => (err.reason_code(), err.to_string()),
            GatewayError::NotConfigured(what) => {
                tracing::error!(target: "gateway.http", missing = %what, "Required integration is not configured");
                ("NOT_CONFIGURED", format!("{} not configured", what))
            }
            GatewayError::Upstream(err) => {
                tracing::warn!(target: "gateway.http", error = %err, "Upstream service failed");
                (
                    "UPSTREAM_ERROR",
                    "An upstream service failed to process the request".to_string(),
                )
            }
            GatewayError::ServiceUnavailable(reason) => {
                tracing::warn!(target: "gateway.http", reason = %reason, "Service unavailable");
                ("SERVICE_UNAVAILABLE", reason.clone())
            }
            GatewayError::Internal(err) => {
                tracing::error!(target: "gateway.http", error = %err, "Internal error");
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
