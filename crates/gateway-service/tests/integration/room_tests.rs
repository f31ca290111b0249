//! Integration tests for `POST /create-room`.

use gateway_test_utils::server_harness::TestGatewayServer;
use gateway_test_utils::token_fixtures::TEST_ROOM;
use reqwest::StatusCode;

#[tokio::test]
async fn test_create_room_uses_default_room() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/create-room", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["room"]["room_name"], TEST_ROOM);
    assert_eq!(body["room"]["status"], "created");
    assert!(body["room"]["message"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn test_create_room_with_name() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("{}/create-room", server.url()))
        .json(&serde_json::json!({ "room_name": "retro" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["room"]["room_name"], "retro");
    Ok(())
}

#[tokio::test]
async fn test_create_room_without_credentials_is_500() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/create-room", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    Ok(())
}
