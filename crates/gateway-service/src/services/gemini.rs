//! Gemini generative-language client.

use crate::config::{ChatBackend, GeminiConfig};
use crate::observability::metrics::record_chat_reply;
use crate::services::chat::ChatResponder;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretString};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{instrument, warn};

/// Request timeout for generation calls in seconds.
const GEMINI_TIMEOUT_SECS: u64 = 30;

/// Connect timeout for generation calls in seconds.
const GEMINI_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Prefix of every reply produced from a failed generation call.
pub const GENERATION_ERROR_PREFIX: &str = "Error generating response:";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("Gemini returned status {status}")]
    Upstream { status: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no text in response")]
    EmptyResponse,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Responder backed by the Gemini `generateContent` API.
pub struct GeminiResponder {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
    system_prompt: Option<String>,
}

impl GeminiResponder {
    /// # Errors
    ///
    /// Returns `GeminiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig, system_prompt: Option<String>) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(GEMINI_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(GEMINI_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt,
        })
    }

    /// The text sent upstream: the system preamble, if any, then the user turn.
    fn full_prompt(&self, prompt: &str) -> String {
        match &self.system_prompt {
            Some(system) => format!("{}\n\nUser: {}", system, prompt),
            None => prompt.to_string(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let full_prompt = self.full_prompt(prompt);
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &full_prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::InvalidResponse(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(GeminiError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl ChatResponder for GeminiResponder {
    fn backend(&self) -> ChatBackend {
        ChatBackend::Gemini
    }

    #[instrument(skip_all, name = "gateway.chat.gemini", fields(model = %self.model))]
    async fn reply(&self, prompt: &str) -> String {
        let start = Instant::now();
        match self.generate(prompt).await {
            Ok(text) => {
                record_chat_reply(self.backend().as_str(), "success", start.elapsed());
                text
            }
            Err(e) => {
                record_chat_reply(self.backend().as_str(), "error", start.elapsed());
                warn!(target: "gateway.chat", error = %e, "Gemini generation failed");
                format!("{} {}", GENERATION_ERROR_PREFIX, e)
            }
        }
    }
}
