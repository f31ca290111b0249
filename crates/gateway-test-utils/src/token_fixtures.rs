//! Token fixtures signed with the harness credentials.
//!
//! The gateway only issues tokens valid from "now"; these helpers sign claims
//! with chosen timestamps so tests can reach the expired and not-yet-valid
//! paths without sleeping.

use chrono::Utc;
use common::secret::SecretString;
use gateway_service::crypto::{sign_claims, AccessClaims, TOKEN_TTL_SECONDS};

/// API key configured by the harness.
pub const TEST_API_KEY: &str = "APItestkey";

/// API secret configured by the harness.
pub const TEST_API_SECRET: &str = "harness-secret-0123456789abcdef";

/// Default room configured by the harness.
pub const TEST_ROOM: &str = "test-room";

/// Sign a participant token issued `issued_offset` seconds from now.
///
/// Negative offsets issue in the past.
pub fn token_issued_at_offset(secret: &str, identity: &str, issued_offset: i64) -> String {
    let now = Utc::now().timestamp() + issued_offset;
    let claims =
        AccessClaims::for_participant(TEST_API_KEY, TEST_ROOM, identity, None, now, "0badcafe")
            .expect("issue time should be in range");
    sign_claims(&claims, &SecretString::from(secret.to_string())).expect("signing should succeed")
}

/// A token whose validity window ended a minute ago.
pub fn expired_token(secret: &str, identity: &str) -> String {
    token_issued_at_offset(secret, identity, -(TOKEN_TTL_SECONDS + 60))
}

/// A token that becomes valid in ten minutes.
pub fn not_yet_valid_token(secret: &str, identity: &str) -> String {
    token_issued_at_offset(secret, identity, 600)
}

/// Replace the first character of the signature segment.
///
/// The first character carries six full signature bits, so the decoded
/// signature always changes.
pub fn tamper_signature(token: &str) -> String {
    let (head, signature) = token.rsplit_once('.').expect("token has a signature segment");
    let mut chars: Vec<char> = signature.chars().collect();
    chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
    format!("{}.{}", head, chars.into_iter().collect::<String>())
}
