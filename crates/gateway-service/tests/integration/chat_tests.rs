//! Integration tests for `POST /ai-response`.
//!
//! Upstream AI services are either replaced with mocks on the app state or
//! served by wiremock and reached through the real HTTP clients.

use gateway_test_utils::mocks::{MockResponder, MockTranscriber};
use gateway_test_utils::server_harness::TestGatewayServer;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn audio_part() -> Part {
    Part::bytes(vec![0u8; 256])
        .file_name("clip.webm")
        .mime_str("audio/webm")
        .unwrap()
}

async fn post_form(
    server: &TestGatewayServer,
    form: Form,
) -> Result<(StatusCode, serde_json::Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/ai-response", server.url()))
        .multipart(form)
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

// ============================================================================
// Text prompts
// ============================================================================

#[tokio::test]
async fn test_text_prompt_is_trimmed_and_answered() -> Result<(), anyhow::Error> {
    let responder = Arc::new(MockResponder::new());
    let server = TestGatewayServer::builder()
        .with_responder(responder.clone())
        .spawn()
        .await?;

    let (status, body) = post_form(&server, Form::new().text("prompt", "  what's up?  ")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "echo: what's up?");
    assert!(body.get("transcript").is_none());
    assert_eq!(responder.prompts(), vec!["what's up?".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_keyword_backend_greets() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let (status, body) = post_form(&server, Form::new().text("prompt", "Hello!")).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().starts_with("Hello!"));
    Ok(())
}

#[tokio::test]
async fn test_empty_input_is_400() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let (status, body) = post_form(&server, Form::new()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = post_form(&server, Form::new().text("prompt", "   \n")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_form(&server, Form::new().text("other", "hello")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/ai-response", server.url()))
        .json(&serde_json::json!({ "prompt": "hi" }))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn test_missing_body_is_json_400() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/ai-response", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    Ok(())
}

// ============================================================================
// Audio prompts
// ============================================================================

#[tokio::test]
async fn test_audio_is_transcribed_and_wins_over_text() -> Result<(), anyhow::Error> {
    let transcriber = Arc::new(MockTranscriber::returning("how are you"));
    let responder = Arc::new(MockResponder::new());
    let server = TestGatewayServer::builder()
        .with_transcriber(transcriber.clone())
        .with_responder(responder.clone())
        .spawn()
        .await?;

    let form = Form::new()
        .text("prompt", "ignored text")
        .part("audio", audio_part());
    let (status, body) = post_form(&server, form).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "how are you");
    assert_eq!(body["response"], "echo: how are you");
    assert_eq!(transcriber.call_count(), 1);

    let upload = transcriber.last_upload().unwrap();
    assert_eq!(upload.file_name, "clip.webm");
    assert_eq!(upload.content_type, "audio/webm");
    assert_eq!(upload.bytes.len(), 256);
    Ok(())
}

#[tokio::test]
async fn test_audio_without_transcriber_is_503() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let (status, body) = post_form(&server, Form::new().part("audio", audio_part())).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    Ok(())
}

#[tokio::test]
async fn test_transcription_failure_is_502() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder()
        .with_transcriber(Arc::new(MockTranscriber::failing()))
        .spawn()
        .await?;

    let (status, body) = post_form(&server, Form::new().part("audio", audio_part())).await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    Ok(())
}

#[tokio::test]
async fn test_blank_transcript_is_400() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder()
        .with_transcriber(Arc::new(MockTranscriber::returning("  ")))
        .spawn()
        .await?;

    let (status, _) = post_form(&server, Form::new().part("audio", audio_part())).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

// ============================================================================
// Real upstream clients against wiremock
// ============================================================================

#[tokio::test]
async fn test_gemini_backend_end_to_end() -> Result<(), anyhow::Error> {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "AIza-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Generated answer" }] } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = TestGatewayServer::builder()
        .with_var("GEMINI_API_KEY", "AIza-test")
        .with_var("GEMINI_BASE_URL", &upstream.uri())
        .with_var("SYSTEM_PROMPT_PATH", "/nonexistent/system_prompt.md")
        .spawn()
        .await?;

    let (status, body) = post_form(&server, Form::new().text("prompt", "question")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Generated answer");
    Ok(())
}

#[tokio::test]
async fn test_gemini_failure_is_reply_text_not_http_error() -> Result<(), anyhow::Error> {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let server = TestGatewayServer::builder()
        .with_var("GEMINI_API_KEY", "AIza-test")
        .with_var("GEMINI_BASE_URL", &upstream.uri())
        .with_var("SYSTEM_PROMPT_PATH", "/nonexistent/system_prompt.md")
        .spawn()
        .await?;

    let (status, body) = post_form(&server, Form::new().text("prompt", "question")).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Error generating response:"));
    Ok(())
}

#[tokio::test]
async fn test_whisper_transcription_end_to_end() -> Result<(), anyhow::Error> {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": "hello" })),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = TestGatewayServer::builder()
        .with_var("OPENAI_API_KEY", "sk-test")
        .with_var("TRANSCRIPTION_BASE_URL", &format!("{}/v1", upstream.uri()))
        .spawn()
        .await?;

    let (status, body) = post_form(&server, Form::new().part("audio", audio_part())).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcript"], "hello");
    assert!(body["response"].as_str().unwrap().starts_with("Hello!"));
    Ok(())
}
