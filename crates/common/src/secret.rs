//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types
//! for every API key and signing secret the gateway holds: the LiveKit API
//! secret, the Gemini API key and the transcription API key.
//!
//! `SecretString` implements `Debug` with redaction, so any struct deriving
//! `Debug` that contains one gets safe logging behavior for free. The value
//! is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct LivekitCredentials {
//!     api_key: String,
//!     api_secret: SecretString, // Debug shows "[REDACTED]"
//! }
//!
//! let creds = LivekitCredentials {
//!     api_key: "APIxyz".to_string(),
//!     api_secret: SecretString::from("shhh"),
//! };
//!
//! println!("{:?}", creds);
//!
//! // Reading the value is always an explicit call
//! let secret: &str = creds.api_secret.expose_secret();
//! ```
//!
//! # Serde Integration
//!
//! With the `serde` feature enabled, secrets can be deserialized from JSON:
//!
//! ```rust
//! use serde::Deserialize;
//! use common::secret::SecretString;
//!
//! #[derive(Debug, Deserialize)]
//! struct UpstreamKey {
//!     provider: String,
//!     api_key: SecretString,
//! }
//!
//! let json = r#"{"provider": "gemini", "api_key": "AIza-test"}"#;
//! let key: UpstreamKey = serde_json::from_str(json).unwrap();
//! println!("{:?}", key);
//! ```

pub use secrecy::{ExposeSecret, SecretBox, SecretString};

/// Returns true when the secret holds no characters.
///
/// An empty signing secret produces forgeable HMAC signatures, so callers
/// treat it the same as a missing one.
#[must_use]
pub fn is_blank(secret: &SecretString) -> bool {
    secret.expose_secret().is_empty()
}
