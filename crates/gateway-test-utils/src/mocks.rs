//! Mock implementations of the gateway's upstream seams.

use async_trait::async_trait;
use gateway_service::config::ChatBackend;
use gateway_service::services::chat::ChatResponder;
use gateway_service::services::transcription::{AudioUpload, Transcriber, TranscriptionError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Responder that echoes the prompt back as `echo: <prompt>` and records
/// every prompt it saw.
#[derive(Default)]
pub struct MockResponder {
    prompts: Mutex<Vec<String>>,
}

impl MockResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatResponder for MockResponder {
    fn backend(&self) -> ChatBackend {
        ChatBackend::Keyword
    }

    async fn reply(&self, prompt: &str) -> String {
        self.prompts.lock().unwrap().push(prompt.to_string());
        format!("echo: {}", prompt)
    }
}

/// Transcriber with a fixed outcome.
pub struct MockTranscriber {
    text: Option<String>,
    call_count: AtomicUsize,
    last_upload: Mutex<Option<AudioUpload>>,
}

impl MockTranscriber {
    /// Always transcribes to `text`.
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            call_count: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
        }
    }

    /// Always fails as if the upstream returned 500.
    pub fn failing() -> Self {
        Self {
            text: None,
            call_count: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
        }
    }

    /// Number of transcription calls made.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent upload received.
    pub fn last_upload(&self) -> Option<AudioUpload> {
        self.last_upload.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: AudioUpload) -> Result<String, TranscriptionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some(audio);

        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(TranscriptionError::Upstream { status: 500 }),
        }
    }
}
