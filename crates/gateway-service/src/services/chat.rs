//! Chat responders.
//!
//! A responder turns free text into a reply. Responders are total: upstream
//! failures come back as reply text, never as errors, so the chat route only
//! fails on bad input.

use crate::config::{ChatBackend, Config, DEFAULT_ROOM_NAME};
use crate::services::gemini::{GeminiError, GeminiResponder};
use crate::services::keyword_responder::KeywordResponder;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Produces a reply for a user prompt.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Which strategy this is, for status reporting and metrics labels.
    fn backend(&self) -> ChatBackend;

    /// Answer `prompt`. Never fails.
    async fn reply(&self, prompt: &str) -> String;
}

/// Read the optional system preamble prepended to generative prompts.
///
/// A missing file means no preamble. An unreadable or blank file is logged
/// and also treated as no preamble.
pub fn load_system_prompt(path: &str) -> Option<String> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::debug!(target: "gateway.chat", path = %path.display(), "No system prompt file");
        return None;
    }

    match std::fs::read_to_string(path) {
        Ok(contents) if !contents.trim().is_empty() => {
            tracing::info!(target: "gateway.chat", path = %path.display(), "Loaded system prompt");
            Some(contents)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(target: "gateway.chat", path = %path.display(), error = %e, "Failed to read system prompt");
            None
        }
    }
}

/// Build the configured responder.
///
/// # Errors
///
/// Returns `GeminiError` if the Gemini HTTP client cannot be built.
pub fn build_responder(config: &Config) -> Result<Arc<dyn ChatResponder>, GeminiError> {
    match (&config.chat_backend, &config.gemini) {
        (ChatBackend::Gemini, Some(gemini)) => {
            let system_prompt = load_system_prompt(&config.system_prompt_path);
            Ok(Arc::new(GeminiResponder::new(gemini, system_prompt)?))
        }
        _ => {
            let room = config
                .livekit
                .as_ref()
                .map(|l| l.default_room.clone())
                .unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string());
            Ok(Arc::new(KeywordResponder::new(room)))
        }
    }
}
