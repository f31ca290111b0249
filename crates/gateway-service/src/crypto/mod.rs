//! Room access token codec.
//!
//! Issues and verifies HS256 compact tokens carrying LiveKit-style room
//! grants. Issuance and validation are pure functions of their inputs plus
//! the clock; nothing is stored server-side, so a token is valid until its
//! `exp` regardless of what happens after issuance.
//!
//! Wire format: `base64url(header).base64url(payload).base64url(signature)`
//! with header `{"alg":"HS256","typ":"JWT"}` and payload keys
//! `iss, sub, exp, nbf, iat, jti, video, name?`.

use crate::observability::metrics::{record_token_issuance, record_token_validation};
use common::jwt::{peek_header, split_compact};
use common::secret::{is_blank, ExposeSecret, SecretString};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::instrument;

/// Lifetime of every issued token (1 hour).
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Number of hex characters in the random `jti` suffix.
pub const JTI_SUFFIX_HEX_LEN: usize = 8;

/// Token codec failures.
///
/// `SigningError` is a server fault. Every other variant is attributable to
/// the presented token and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signing failed: {0}")]
    SigningError(String),

    #[error("The access token is malformed")]
    MalformedToken,

    #[error("The access token signature is invalid")]
    InvalidSignature,

    #[error("The access token has expired")]
    Expired,

    #[error("The access token is not yet valid")]
    NotYetValid,
}

impl TokenError {
    /// Stable machine-readable code, also used as a bounded metrics label.
    pub fn reason_code(&self) -> &'static str {
        match self {
            TokenError::SigningError(_) => "SIGNING_ERROR",
            TokenError::MalformedToken => "MALFORMED_TOKEN",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::Expired => "TOKEN_EXPIRED",
            TokenError::NotYetValid => "TOKEN_NOT_YET_VALID",
        }
    }
}

/// Room permissions carried in the `video` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room: String,
    pub room_join: bool,
    pub can_publish: bool,
    pub can_subscribe: bool,
    pub can_publish_data: bool,
    pub hidden: bool,
    pub recorder: bool,
}

impl VideoGrant {
    /// The fixed grant set handed to every participant.
    pub fn participant(room: &str) -> Self {
        Self {
            room: room.to_string(),
            room_join: true,
            can_publish: true,
            can_subscribe: true,
            can_publish_data: true,
            hidden: false,
            recorder: false,
        }
    }
}

/// Claims of one issued room access token.
///
/// `sub`, `jti` and `name` identify a participant and are redacted in Debug
/// output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String,
    pub sub: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub jti: String,
    pub video: VideoGrant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl fmt::Debug for AccessClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessClaims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .field("jti", &"[REDACTED]")
            .field("video", &self.video)
            .field("name", &self.name.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AccessClaims {
    /// Build the claims for a fresh participant token issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::SigningError` if `now` is too close to the end of
    /// the timestamp range for an expiry to be computed.
    pub fn for_participant(
        issuer: &str,
        room: &str,
        identity: &str,
        display_name: Option<&str>,
        now: i64,
        jti_suffix: &str,
    ) -> Result<Self, TokenError> {
        let exp = now.checked_add(TOKEN_TTL_SECONDS).ok_or_else(|| {
            TokenError::SigningError("issue time is out of range".to_string())
        })?;

        Ok(Self {
            iss: issuer.to_string(),
            sub: identity.to_string(),
            exp,
            nbf: now,
            iat: now,
            jti: format!("{}-{}-{}", identity, now, jti_suffix),
            video: VideoGrant::participant(room),
            name: display_name.map(ToString::to_string),
        })
    }
}

/// Generate the random `jti` suffix from the OS CSPRNG.
fn generate_jti_suffix() -> Result<String, TokenError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; JTI_SUFFIX_HEX_LEN / 2];
    rng.fill(&mut bytes)
        .map_err(|e| TokenError::SigningError(format!("Random bytes generation failed: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Sign arbitrary claims with HS256.
///
/// Issuance goes through [`issue_token_at`]; this is exposed so fixtures can
/// sign claims with chosen timestamps.
#[instrument(skip_all)]
pub fn sign_claims(claims: &AccessClaims, secret: &SecretString) -> Result<String, TokenError> {
    if is_blank(secret) {
        return Err(TokenError::SigningError(
            "signing secret is empty".to_string(),
        ));
    }

    let encoding_key = EncodingKey::from_secret(secret.expose_secret().as_bytes());
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &encoding_key)
        .map_err(|e| TokenError::SigningError(format!("JWT signing operation failed: {}", e)))
}

/// Issue a room access token valid for [`TOKEN_TTL_SECONDS`] from now.
pub fn issue_token(
    secret: &SecretString,
    issuer: &str,
    room: &str,
    identity: &str,
    display_name: Option<&str>,
) -> Result<String, TokenError> {
    issue_token_at(
        secret,
        issuer,
        room,
        identity,
        display_name,
        chrono::Utc::now().timestamp(),
    )
}

/// Issue a room access token as of `now` (Unix seconds).
///
/// # Errors
///
/// `SigningError` if the secret, issuer, room or identity is empty, if the
/// CSPRNG fails, or if encoding fails.
#[instrument(skip_all)]
pub fn issue_token_at(
    secret: &SecretString,
    issuer: &str,
    room: &str,
    identity: &str,
    display_name: Option<&str>,
    now: i64,
) -> Result<String, TokenError> {
    let start = Instant::now();

    let result = build_and_sign(secret, issuer, room, identity, display_name, now);

    let status = if result.is_ok() { "success" } else { "error" };
    record_token_issuance(status, start.elapsed());

    if let Err(e) = &result {
        tracing::warn!(target: "gateway.crypto", error = %e, "Token issuance failed");
    }

    result
}

fn build_and_sign(
    secret: &SecretString,
    issuer: &str,
    room: &str,
    identity: &str,
    display_name: Option<&str>,
    now: i64,
) -> Result<String, TokenError> {
    for (field, value) in [("issuer", issuer), ("room", room), ("identity", identity)] {
        if value.is_empty() {
            return Err(TokenError::SigningError(format!("{} must not be empty", field)));
        }
    }

    let jti_suffix = generate_jti_suffix()?;
    let claims =
        AccessClaims::for_participant(issuer, room, identity, display_name, now, &jti_suffix)?;

    sign_claims(&claims, secret)
}

/// Validate a token against the current clock.
pub fn validate_token(secret: &SecretString, token: &str) -> Result<AccessClaims, TokenError> {
    validate_token_at(secret, token, chrono::Utc::now().timestamp())
}

/// Validate a token as of `now` (Unix seconds).
///
/// Checks, in order: structure, HS256 signature (constant-time compare),
/// payload structure, `now < exp`, `now >= nbf`. The library's own time
/// checks are disabled so the window is exact with zero leeway.
#[instrument(skip_all)]
pub fn validate_token_at(
    secret: &SecretString,
    token: &str,
    now: i64,
) -> Result<AccessClaims, TokenError> {
    let result = verify_and_check_window(secret, token, now);

    match &result {
        Ok(_) => record_token_validation("success", None),
        Err(e) => {
            tracing::debug!(target: "gateway.crypto", reason = e.reason_code(), "Token rejected");
            record_token_validation("error", Some(e.reason_code()));
        }
    }

    result
}

fn verify_and_check_window(
    secret: &SecretString,
    token: &str,
    now: i64,
) -> Result<AccessClaims, TokenError> {
    split_compact(token).map_err(|_| TokenError::MalformedToken)?;

    // An empty key would make every signature trivially forgeable.
    if is_blank(secret) {
        return Err(TokenError::InvalidSignature);
    }

    let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.set_required_spec_claims::<&str>(&[]);

    let claims = decode::<AccessClaims>(token, &decoding_key, &validation)
        .map_err(|e| {
            let declared_alg = peek_header(token)
                .ok()
                .and_then(|h| h.get("alg").and_then(|a| a.as_str()).map(str::to_string))
                .unwrap_or_default();
            tracing::debug!(target: "gateway.crypto", error = %e, alg = %declared_alg, "Token verification failed");
            map_decode_error(&e)
        })?
        .claims;

    if now >= claims.exp {
        return Err(TokenError::Expired);
    }

    if now < claims.nbf {
        return Err(TokenError::NotYetValid);
    }

    Ok(claims)
}

fn map_decode_error(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::MalformedToken,
    }
}
