mod common;

use common::TestApp;
use relay_service::services::providers::mock::MockTextProvider;
use reqwest::Client;
use std::sync::Arc;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("ok"))).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "relay-service");
}

#[tokio::test]
async fn readiness_check_reflects_a_healthy_provider() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("ok"))).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_reflects_an_unhealthy_provider() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::failing())).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn metrics_endpoint_returns_prometheus_format() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::replying("ok"))).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let content_type = response
        .headers()
        .get("content-type")
        .expect("Missing content-type header")
        .to_str()
        .expect("Invalid content-type");

    assert!(content_type.starts_with("text/plain"));

    let body = response.text().await.expect("Failed to get response body");
    // Prometheus text format: HELP/TYPE comments or metric lines. The body
    // may be empty if nothing has been recorded yet.
    assert!(
        body.is_empty() || body.contains('#') || body.contains('_'),
        "Unexpected metrics format: {}",
        body
    );
}
