//! Integration tests for `/`, `/health` and `/metrics`.

use gateway_test_utils::server_harness::TestGatewayServer;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_returns_ok() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn test_status_without_integrations() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/", server.url())).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "running");
    assert_eq!(body["livekit_configured"], false);
    assert_eq!(body["chat_backend"], "keyword");
    assert_eq!(body["transcription_configured"], false);
    assert_eq!(body["environment"], "development");
    Ok(())
}

#[tokio::test]
async fn test_status_with_integrations() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder()
        .with_livekit()
        .with_var("GEMINI_API_KEY", "AIza-test")
        .with_var("SYSTEM_PROMPT_PATH", "/nonexistent/system_prompt.md")
        .with_var("OPENAI_API_KEY", "sk-test")
        .with_var("ENVIRONMENT", "production")
        .spawn()
        .await?;

    let body: serde_json::Value = reqwest::get(format!("{}/", server.url()))
        .await?
        .json()
        .await?;

    assert_eq!(body["livekit_configured"], true);
    assert_eq!(body["chat_backend"], "gemini");
    assert_eq!(body["transcription_configured"], true);
    assert_eq!(body["environment"], "production");

    let text = body.to_string();
    assert!(!text.contains("AIza-test"), "status must not leak keys");
    assert!(!text.contains("sk-test"), "status must not leak keys");
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_serves_text() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/nope", server.url())).await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
