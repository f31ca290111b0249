//! Chat handler.
//!
//! `POST /ai-response` takes a multipart form with an optional `prompt` text
//! field and an optional `audio` file field. Audio wins when both are sent:
//! it is transcribed and the transcript becomes the prompt.

use crate::errors::GatewayError;
use crate::models::ChatResponse;
use crate::routes::AppState;
use crate::services::transcription::AudioUpload;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

const PROMPT_FIELD: &str = "prompt";
const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Default)]
struct ChatForm {
    prompt: Option<String>,
    audio: Option<AudioUpload>,
}

fn multipart_error(e: impl std::fmt::Display) -> GatewayError {
    GatewayError::BadRequest(format!("Invalid multipart body: {}", e))
}

/// Collect the known form fields; unknown fields are skipped. An empty audio
/// part counts as no audio.
async fn read_chat_form(mut multipart: Multipart) -> Result<ChatForm, GatewayError> {
    let mut form = ChatForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(PROMPT_FIELD) => {
                form.prompt = Some(field.text().await.map_err(multipart_error)?);
            }
            Some(AUDIO_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !bytes.is_empty() {
                    form.audio = Some(AudioUpload::new(bytes.to_vec(), file_name, content_type));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Handle a chat prompt.
///
/// POST /ai-response
///
/// # Errors
///
/// - 400 if the body is not a multipart form or neither field yields
///   non-blank text
/// - 503 if audio is sent but transcription is not configured
/// - 502 if the transcription service fails
#[instrument(skip_all, name = "gateway.chat.ai_response")]
pub async fn ai_response(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let form = read_chat_form(multipart.map_err(|e| multipart_error(e.body_text()))?).await?;

    let (prompt, transcript) = match form.audio {
        Some(audio) => {
            let transcriber = state.transcriber.as_ref().ok_or_else(|| {
                GatewayError::ServiceUnavailable("Audio transcription is not configured".to_string())
            })?;
            let text = transcriber.transcribe(audio).await?;
            (text.clone(), Some(text))
        }
        None => (form.prompt.unwrap_or_default(), None),
    };

    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(GatewayError::BadRequest("No prompt provided".to_string()));
    }

    tracing::debug!(
        target: "gateway.chat",
        backend = state.responder.backend().as_str(),
        from_audio = transcript.is_some(),
        "Answering prompt"
    );

    let response = state.responder.reply(prompt).await;

    Ok(Json(ChatResponse {
        response,
        transcript,
    }))
}
