//! Integration tests for `/get-token`, `/test-token` and `/verify-token`.

use gateway_test_utils::server_harness::TestGatewayServer;
use gateway_test_utils::token_fixtures::{
    expired_token, not_yet_valid_token, tamper_signature, TEST_API_KEY, TEST_API_SECRET, TEST_ROOM,
};
use reqwest::StatusCode;

async fn issue(server: &TestGatewayServer, query: &str) -> Result<serde_json::Value, anyhow::Error> {
    let response = reqwest::get(format!("{}/get-token?{}", server.url(), query)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(response.json().await?)
}

async fn verify(
    server: &TestGatewayServer,
    token: &str,
) -> Result<(StatusCode, serde_json::Value), anyhow::Error> {
    let response = reqwest::Client::new()
        .post(format!("{}/verify-token", server.url()))
        .json(&serde_json::json!({ "token": token }))
        .send()
        .await?;
    let status = response.status();
    Ok((status, response.json().await?))
}

// ============================================================================
// GET /get-token
// ============================================================================

#[tokio::test]
async fn test_get_token_issues_for_default_room() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    let body = issue(&server, "identity=alice").await?;

    assert_eq!(body["identity"], "alice");
    assert_eq!(body["room"], TEST_ROOM);
    assert_eq!(body["url"], "wss://livekit.test");
    assert_eq!(body["expires_in"], 3600);
    assert_eq!(body["token"].as_str().unwrap().split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_get_token_honours_room_and_name() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    let body = issue(&server, "identity=bob&name=Bob%20B&room=standup").await?;
    assert_eq!(body["room"], "standup");

    let (status, verified) = verify(&server, body["token"].as_str().unwrap()).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["claims"]["video"]["room"], "standup");
    assert_eq!(verified["claims"]["name"], "Bob B");
    assert_eq!(verified["claims"]["iss"], TEST_API_KEY);
    Ok(())
}

#[tokio::test]
async fn test_get_token_requires_identity() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    for query in ["", "identity=", "identity=%20%20"] {
        let response = reqwest::get(format!("{}/get-token?{}", server.url(), query)).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {:?}", query);

        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
    Ok(())
}

#[tokio::test]
async fn test_get_token_without_credentials_is_500() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/get-token?identity=alice", server.url())).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    Ok(())
}

#[tokio::test]
async fn test_missing_identity_checked_before_configuration() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/get-token", server.url())).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

// ============================================================================
// GET /test-token
// ============================================================================

#[tokio::test]
async fn test_test_token_defaults_identity() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;

    let response = reqwest::get(format!("{}/test-token", server.url())).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["identity"], "test-user");
    assert_eq!(body["room"], TEST_ROOM);
    assert!(body["token"].as_str().is_some());
    Ok(())
}

#[tokio::test]
async fn test_test_token_unconfigured_is_still_200() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let response = reqwest::get(format!("{}/test-token?identity=zoe", server.url())).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "NOT_CONFIGURED");
    assert!(body.get("token").is_none());
    Ok(())
}

// ============================================================================
// POST /verify-token
// ============================================================================

#[tokio::test]
async fn test_verify_issued_token() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;
    let token = issue(&server, "identity=carol").await?["token"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = verify(&server, &token).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["claims"]["sub"], "carol");
    assert_eq!(body["claims"]["video"]["roomJoin"], true);
    assert_eq!(body["claims"]["video"]["canPublish"], true);
    assert_eq!(body["claims"]["video"]["hidden"], false);

    let exp = body["claims"]["exp"].as_i64().unwrap();
    let nbf = body["claims"]["nbf"].as_i64().unwrap();
    assert_eq!(exp - nbf, 3600);
    Ok(())
}

#[tokio::test]
async fn test_verify_rejections_carry_reason_codes() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;
    let fresh = issue(&server, "identity=dave").await?["token"]
        .as_str()
        .unwrap()
        .to_string();

    let cases = [
        ("not-a-jwt".to_string(), "MALFORMED_TOKEN"),
        ("a..c".to_string(), "MALFORMED_TOKEN"),
        (tamper_signature(&fresh), "INVALID_SIGNATURE"),
        (expired_token(TEST_API_SECRET, "dave"), "TOKEN_EXPIRED"),
        (not_yet_valid_token(TEST_API_SECRET, "dave"), "TOKEN_NOT_YET_VALID"),
        (
            expired_token("some-other-secret", "dave"),
            "INVALID_SIGNATURE",
        ),
    ];

    for (token, expected_code) in cases {
        let (status, body) = verify(&server, &token).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected {}", expected_code);
        assert_eq!(body["error"]["code"], expected_code);
    }
    Ok(())
}

#[tokio::test]
async fn test_verify_without_credentials_is_500() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::spawn().await?;

    let (status, body) = verify(&server, "a.b.c").await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    Ok(())
}

#[tokio::test]
async fn test_verify_malformed_body_is_json_400() -> Result<(), anyhow::Error> {
    let server = TestGatewayServer::builder().with_livekit().spawn().await?;
    let client = reqwest::Client::new();

    let missing_field = client
        .post(format!("{}/verify-token", server.url()))
        .json(&serde_json::json!({}))
        .send()
        .await?;
    let not_json = client
        .post(format!("{}/verify-token", server.url()))
        .body("token=abc")
        .send()
        .await?;

    for response in [missing_field, not_json] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await?;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
    Ok(())
}
