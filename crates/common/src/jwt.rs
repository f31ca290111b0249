//! Compact JWT helpers shared across Room Gateway crates.
//!
//! This module provides the structural checks that run before any
//! cryptographic work:
//! - Size limit for DoS prevention
//! - Three-segment `header.payload.signature` split
//! - Unverified header inspection for diagnostics
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Nothing here verifies a signature; callers must still verify
//! - Error messages are generic; details go to debug logs
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{split_compact, MAX_JWT_SIZE_BYTES};
//!
//! let [header, payload, signature] = split_compact(token)?;
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// Room access tokens are ~400 bytes. Anything larger than this is rejected
/// before base64 decoding or HMAC computation.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Number of dot-separated segments in a compact signed token.
pub const TOKEN_SEGMENT_COUNT: usize = 3;

// =============================================================================
// Error Types
// =============================================================================

/// Structural errors detected before signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtFormatError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is malformed")]
    TokenTooLarge,

    /// Token is not a valid compact JWT structure.
    #[error("The access token is malformed")]
    MalformedToken,
}

// =============================================================================
// Functions
// =============================================================================

/// Split a compact token into its header, payload and signature segments.
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - Not exactly three segments, or a segment is empty
pub fn split_compact(token: &str) -> Result<[&str; TOKEN_SEGMENT_COUNT], JwtFormatError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtFormatError::TokenTooLarge);
    }

    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok([header, payload, signature])
        }
        _ => {
            tracing::debug!(
                target: "common.jwt",
                parts = token.split('.').count(),
                "Token rejected: invalid JWT format"
            );
            Err(JwtFormatError::MalformedToken)
        }
    }
}

/// Decode the header segment of a token WITHOUT verifying the signature.
///
/// Only for diagnostics (e.g. logging the declared `alg`). Never trust the
/// returned value for authorization decisions.
///
/// # Errors
///
/// Returns `JwtFormatError` if the structure, base64 or JSON is invalid.
pub fn peek_header(token: &str) -> Result<serde_json::Value, JwtFormatError> {
    let [header, _, _] = split_compact(token)?;

    let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtFormatError::MalformedToken
    })?;

    serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtFormatError::MalformedToken
    })
}
