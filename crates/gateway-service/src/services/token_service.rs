//! Room token service.
//!
//! Wraps the token codec with the configured LiveKit credentials and logs
//! issuance and validation at the service boundary.

use crate::config::LivekitConfig;
use crate::crypto::{self, AccessClaims, TokenError, TOKEN_TTL_SECONDS};
use crate::observability::hash_for_correlation;
use common::secret::SecretString;
use std::fmt;

/// Issues and validates room access tokens for one set of LiveKit credentials.
///
/// Built once at startup from configuration and shared read-only between
/// requests.
#[derive(Clone)]
pub struct RoomTokenCodec {
    api_key: String,
    api_secret: SecretString,
    default_room: String,
}

impl fmt::Debug for RoomTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomTokenCodec")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("default_room", &self.default_room)
            .finish()
    }
}

impl RoomTokenCodec {
    pub fn new(api_key: String, api_secret: SecretString, default_room: String) -> Self {
        Self {
            api_key,
            api_secret,
            default_room,
        }
    }

    pub fn from_config(config: &LivekitConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.api_secret.clone(),
            config.default_room.clone(),
        )
    }

    pub fn default_room(&self) -> &str {
        &self.default_room
    }

    pub fn ttl_seconds(&self) -> i64 {
        TOKEN_TTL_SECONDS
    }

    /// Issue a token for the default room.
    pub fn issue(&self, identity: &str, display_name: Option<&str>) -> Result<String, TokenError> {
        self.issue_for_room(&self.default_room, identity, display_name)
    }

    /// Issue a token for a specific room.
    pub fn issue_for_room(
        &self,
        room: &str,
        identity: &str,
        display_name: Option<&str>,
    ) -> Result<String, TokenError> {
        let token = crypto::issue_token(
            &self.api_secret,
            &self.api_key,
            room,
            identity,
            display_name,
        )?;

        tracing::info!(
            target: "gateway.tokens",
            identity = %hash_for_correlation(identity),
            room = %room,
            "Room token issued"
        );

        Ok(token)
    }

    /// Verify a token's signature and validity window.
    pub fn validate(&self, token: &str) -> Result<AccessClaims, TokenError> {
        crypto::validate_token(&self.api_secret, token)
    }
}
