//! Integration tests for the webhook endpoint.
//!
//! These drive the full axum router with the stub transport and an in-memory
//! log sink.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use githook::{
    server::{self, AppState},
    Config, DispatchBody, MemoryLogSink, StubTransport, TransportError, TransportKind,
};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    transport: Arc<StubTransport>,
    sink: Arc<MemoryLogSink>,
}

fn test_config() -> Config {
    Config {
        transport: TransportKind::Stub,
        deployment_url: "http://deploy.test/hooks/deploy".to_string(),
        ..Config::default()
    }
}

fn spawn_app_with(config: &Config, transport: StubTransport) -> TestApp {
    let transport = Arc::new(transport);
    let sink = Arc::new(MemoryLogSink::new());
    let state = AppState::new(config, transport.clone(), sink.clone());

    TestApp {
        router: server::build_router(state),
        transport,
        sink,
    }
}

fn spawn_app() -> TestApp {
    spawn_app_with(&test_config(), StubTransport::new())
}

async fn post_webhook(router: &Router, event: Option<&str>) -> (StatusCode, DispatchBody) {
    let mut builder = Request::builder().method("POST").uri(server::WEBHOOK_PATH);
    if let Some(event) = event {
        builder = builder.header("x-github-event", event);
    }
    let request = builder
        .header("content-type", "application/json")
        .body(Body::from(r#"{"action":"created"}"#))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: DispatchBody = serde_json::from_slice(&bytes).expect("JSON dispatch body");

    (status, body)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_deployment_event_triggers_one_outbound_call() {
    let app = spawn_app();

    let (status, body) = post_webhook(&app.router, Some("deployment")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.status, "OK");
    assert_eq!(body.event, "deployment");

    let calls = app.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "http://deploy.test/hooks/deploy");
    assert!(calls[0].body.is_empty());

    assert_eq!(
        app.sink.messages(),
        vec![
            "Received GitHub event: deployment",
            "Handling deployment event"
        ]
    );
}

#[tokio::test]
async fn test_push_event_is_unknown() {
    let app = spawn_app();

    let (status, body) = post_webhook(&app.router, Some("push")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.status, "Unknown event");
    assert_eq!(body.event, "push");
    assert_eq!(app.transport.call_count(), 0);
    assert_eq!(
        app.sink.messages(),
        vec!["Received GitHub event: push", "Ignoring unknown event: push"]
    );
}

#[tokio::test]
async fn test_missing_header_is_empty_unknown_event() {
    let app = spawn_app();

    let (status, body) = post_webhook(&app.router, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.status, "Unknown event");
    assert_eq!(body.event, "");
    assert_eq!(
        app.sink.messages(),
        vec!["Received GitHub event: ", "Ignoring unknown event: "]
    );
}

#[tokio::test]
async fn test_batch_of_distinct_events() {
    let app = spawn_app();

    let tokens = [
        "check_run",
        "check_suite",
        "create",
        "delete",
        "deployment",
        "deployment_status",
        "fork",
        "gollum",
        "issue_comment",
        "issues",
        "label",
        "member",
        "milestone",
        "page_build",
        "ping",
        "project",
        "public",
        "pull_request",
        "pull_request_review",
        "push",
        "release",
        "repository",
        "status",
        "watch",
    ];
    assert_eq!(tokens.len(), 24);

    let mut ok = 0;
    let mut bad_request = 0;
    for token in tokens {
        let (status, body) = post_webhook(&app.router, Some(token)).await;
        assert_eq!(body.event, token);
        match status {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => bad_request += 1,
            other => panic!("unexpected status {other} for {token}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(bad_request, 23);
    assert_eq!(app.transport.call_count(), 1);

    let records = app.sink.records();
    assert_eq!(records.len(), 48);

    let receipts: Vec<String> = records
        .iter()
        .filter(|r| r.message.starts_with("Received GitHub event: "))
        .map(|r| r.event.clone())
        .collect();
    assert_eq!(receipts, tokens);
}

#[tokio::test]
async fn test_transport_failure_keeps_ok_response_by_default() {
    let app = spawn_app_with(&test_config(), StubTransport::failing(TransportError::Timeout));

    let (status, body) = post_webhook(&app.router, Some("deployment")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.status, "OK");
    assert_eq!(app.transport.call_count(), 1);
    assert_eq!(app.sink.records().len(), 2);
}

#[tokio::test]
async fn test_strict_mode_surfaces_transport_failure() {
    let config = Config {
        strict_deployment: true,
        ..test_config()
    };
    let app = spawn_app_with(
        &config,
        StubTransport::failing(TransportError::Status { status: 500 }),
    );

    let (status, body) = post_webhook(&app.router, Some("deployment")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.status, "Deployment failed");
    assert_eq!(body.event, "deployment");
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}
