//! Speech-to-text client.
//!
//! Talks to any OpenAI-compatible `/audio/transcriptions` endpoint. Calls are
//! bounded by the HTTP client's timeouts and are never retried here.

use crate::config::TranscriptionConfig;
use crate::observability::metrics::record_transcription;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretString};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{instrument, warn};

/// Request timeout for transcription calls in seconds.
const TRANSCRIPTION_TIMEOUT_SECS: u64 = 60;

/// Connect timeout for transcription calls in seconds.
const TRANSCRIPTION_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Transcription request could not be built: {0}")]
    InvalidRequest(String),

    #[error("Transcription transport error: {0}")]
    Transport(String),

    #[error("Transcription service returned status {status}")]
    Upstream { status: u16 },

    #[error("Transcription response was invalid: {0}")]
    InvalidResponse(String),
}

/// An uploaded audio clip.
#[derive(Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl std::fmt::Debug for AudioUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioUpload")
            .field("len", &self.bytes.len())
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl AudioUpload {
    /// Build an upload, inferring the content type from the file name when
    /// the client did not send a usable one.
    pub fn new(bytes: Vec<u8>, file_name: Option<String>, content_type: Option<String>) -> Self {
        let file_name = file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "audio.wav".to_string());
        let content_type = content_type
            .filter(|ct| ct.starts_with("audio/") || ct.starts_with("video/"))
            .unwrap_or_else(|| mime_for_file_name(&file_name).to_string());

        Self {
            bytes,
            file_name,
            content_type,
        }
    }
}

/// Guess the audio MIME type from a file extension.
pub fn mime_for_file_name(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" | "mpga" | "mpeg" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "webm" => "audio/webm",
        "m4a" | "mp4" => "audio/mp4",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// Converts audio into text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, TranscriptionError>;
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper transcription over the OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct WhisperTranscriber {
    client: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl WhisperTranscriber {
    /// # Errors
    ///
    /// Returns `TranscriptionError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TRANSCRIPTION_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(TRANSCRIPTION_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    async fn send(&self, audio: AudioUpload) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let part = Part::bytes(audio.bytes)
            .file_name(audio.file_name)
            .mime_str(&audio.content_type)
            .map_err(|e| TranscriptionError::InvalidRequest(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(target: "gateway.transcription", status = %status, body = %body, "Transcription request rejected");
            return Err(TranscriptionError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        Ok(parsed.text.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    #[instrument(skip_all, name = "gateway.transcription", fields(bytes = audio.bytes.len()))]
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, TranscriptionError> {
        let start = Instant::now();
        let result = self.send(audio).await;

        let status = if result.is_ok() { "success" } else { "error" };
        record_transcription(status, start.elapsed());

        if let Err(e) = &result {
            warn!(target: "gateway.transcription", error = %e, "Transcription failed");
        }

        result
    }
}
