//! Observability for the gateway: metrics and log-safe field hashing.
//!
//! # Privacy by Default
//!
//! Handlers use `#[instrument(skip_all)]` and add fields explicitly:
//! - **SAFE**: logged in plaintext (route, backend, status)
//! - **HASHED**: SHA-256 prefix for correlation (participant identity)
//! - **NEVER**: must not appear in logs (API secrets, tokens, prompts)

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for participant identities so one participant's requests can be
/// correlated across log lines without logging who they are.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    result
        .get(..4)
        .map(hex::encode)
        .unwrap_or_default()
}
