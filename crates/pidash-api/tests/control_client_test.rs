#![allow(clippy::unwrap_used)]
// Integration tests for `ControlClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pidash_api::{ControlClient, Error, PowerAction};

async fn setup() -> (MockServer, ControlClient) {
    let server = MockServer::start().await;
    let client = ControlClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    );
    (server, client)
}

// ── Power actions ───────────────────────────────────────────────────

#[tokio::test]
async fn test_shutdown_posts_action_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/power/shutdown"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "action": "shutdown" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Shutdown initiated",
            "countdown": 60
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .send_power_action(PowerAction::Shutdown)
        .await
        .unwrap();

    assert_eq!(resp.message.as_deref(), Some("Shutdown initiated"));
    assert_eq!(resp.countdown, Some(60));
}

#[tokio::test]
async fn test_reboot_accepts_empty_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/power/reboot"))
        .and(body_json(json!({ "action": "reboot" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.send_power_action(PowerAction::Reboot).await.unwrap();
    assert_eq!(resp.status, None);
}

#[tokio::test]
async fn test_power_action_failure_surfaces_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/power/reboot"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": "error",
            "error": "Reboot command failed"
        })))
        .mount(&server)
        .await;

    let result = client.send_power_action(PowerAction::Reboot).await;

    assert!(
        matches!(result, Err(Error::Status { status: 500, .. })),
        "expected Status error, got: {result:?}"
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "HTTP 500: Internal Server Error"
    );
}

#[tokio::test]
async fn test_power_action_unreachable_is_transport_error() {
    let client = ControlClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:1").unwrap(),
    );

    let err = client
        .send_power_action(PowerAction::Shutdown)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
    assert!(err.is_unreachable());
}

// ── Liveness probe ──────────────────────────────────────────────────

#[tokio::test]
async fn test_liveness_probe_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "online",
            "uptime": "up 2 minutes"
        })))
        .mount(&server)
        .await;

    assert!(client.probe_liveness().await);
}

#[tokio::test]
async fn test_liveness_probe_non_success_is_false() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!client.probe_liveness().await);
}

#[tokio::test]
async fn test_liveness_probe_times_out() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    assert!(!client.probe_liveness().await);
}
