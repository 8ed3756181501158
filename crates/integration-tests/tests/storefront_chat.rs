//! Support chat relay.

#![allow(clippy::unwrap_used)]

use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::{Value, json};
use stride_core::chat::FALLBACK_REPLY;
use stride_integration_tests::{TestApp, spawn_webhook, test_config};

async fn app_with_webhook(url: String) -> TestApp {
    let mut config = test_config();
    config.chat.webhook_url = Some(SecretString::from(url));
    TestApp::spawn_with(config).await
}

async fn chat(app: &TestApp, message: &str) -> reqwest::Response {
    app.post_json("/api/chat", &json!({ "message": message }))
        .await
}

#[tokio::test]
async fn test_unconfigured_webhook_falls_back() {
    let app = TestApp::spawn().await;

    let response = chat(&app, "Do you ship to Canada?").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reply"], FALLBACK_REPLY);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = TestApp::spawn().await;

    let response = chat(&app, "   ").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_webhook_reply_and_stable_session() {
    let url = spawn_webhook(Router::new().route(
        "/hook",
        post(|Json(body): Json<Value>| async move {
            Json(json!({
                "output": format!("echo {} {}", body["message"].as_str().unwrap_or_default(), body["sessionId"].as_str().unwrap_or_default())
            }))
        }),
    ))
    .await;
    let app = app_with_webhook(url).await;

    let first: Value = chat(&app, "hello").await.json().await.unwrap();
    let session_id = first["sessionId"].as_str().unwrap().to_string();
    assert_eq!(first["reply"], format!("echo hello {session_id}"));

    let second: Value = chat(&app, "again").await.json().await.unwrap();
    assert_eq!(second["sessionId"], session_id.as_str());
}

#[tokio::test]
async fn test_failing_webhook_falls_back() {
    let url = spawn_webhook(Router::new().route(
        "/hook",
        post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;
    let app = app_with_webhook(url).await;

    let body: Value = chat(&app, "hello").await.json().await.unwrap();
    assert_eq!(body["reply"], FALLBACK_REPLY);
}
