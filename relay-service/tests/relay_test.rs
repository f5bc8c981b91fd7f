//! Integration tests for the two relay routes.

mod common;

use common::TestApp;
use relay_service::services::providers::mock::MockTextProvider;
use reqwest::Client;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const REFUSAL: &str = "I'm here to help with health-related questions only. Please ask something related to health or wellness.";

async fn post_prompt(
    client: &Client,
    address: &str,
    path: &str,
    prompt: &str,
) -> reqwest::Response {
    client
        .post(format!("{}{}", address, path))
        .json(&serde_json::json!({ "prompt": prompt }))
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn off_topic_prompt_is_refused_without_an_upstream_call() {
    let mock = MockTextProvider::replying("Eat vegetables.");
    let calls = mock.call_counter();
    let app = TestApp::spawn(Arc::new(mock)).await;
    let client = Client::new();

    let response = post_prompt(
        &client,
        &app.address,
        "/api/ai-health-chat",
        "What's the weather?",
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["msg"], REFUSAL);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_prompt_is_relayed_exactly_once() {
    let mock = MockTextProvider::replying("Eat vegetables.");
    let calls = mock.call_counter();
    let app = TestApp::spawn(Arc::new(mock)).await;
    let client = Client::new();

    let response = post_prompt(
        &client,
        &app.address,
        "/api/ai-health-chat",
        "What should I eat for a healthy diet?",
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["msg"], "Eat vegetables.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn keyword_gate_is_case_insensitive() {
    let mock = MockTextProvider::replying("See a professional.");
    let calls = mock.call_counter();
    let app = TestApp::spawn(Arc::new(mock)).await;
    let client = Client::new();

    let response = post_prompt(
        &client,
        &app.address,
        "/api/ai-health-chat",
        "Should I see a DOCTOR about this?",
    )
    .await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["msg"], "See a professional.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn ask_route_relays_prompts_the_gated_route_would_refuse() {
    let mock = MockTextProvider::replying("Sunny with a chance of rain.");
    let calls = mock.call_counter();
    let app = TestApp::spawn(Arc::new(mock)).await;
    let client = Client::new();

    let response = post_prompt(&client, &app.address, "/api/ask", "What's the weather?").await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Sunny with a chance of rain.");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_envelope_falls_back_to_the_fixed_literal() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::empty())).await;
    let client = Client::new();

    let response = post_prompt(&client, &app.address, "/api/ask", "Anything at all").await;

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "No response from Gemini");
}

#[tokio::test]
async fn upstream_failure_returns_500_on_the_health_route() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::failing())).await;
    let client = Client::new();

    let response = post_prompt(
        &client,
        &app.address,
        "/api/ai-health-chat",
        "Is this healthy?",
    )
    .await;

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["msg"], "AI Assistant is currently unavailable.");
}

#[tokio::test]
async fn upstream_failure_returns_500_on_the_ask_route() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::failing())).await;
    let client = Client::new();

    let response = post_prompt(&client, &app.address, "/api/ask", "Anything at all").await;

    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Something went wrong");
}

#[tokio::test]
async fn a_failed_request_does_not_take_the_server_down() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::failing())).await;
    let client = Client::new();

    let response = post_prompt(&client, &app.address, "/api/ask", "first").await;
    assert_eq!(response.status().as_u16(), 500);

    // The server keeps answering after an upstream failure.
    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());
}
