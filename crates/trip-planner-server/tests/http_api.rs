// crates/trip-planner-server/tests/http_api.rs
// ============================================================================
// Module: HTTP API Tests
// Description: End-to-end requests against a live axum listener.
// Purpose: Verify routing, body limits, and JSON responses over HTTP.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use trip_planner_server::PlanOutcome;
use trip_planner_server::TripPlannerServer;

use crate::common::RecordingSink;
use crate::common::StubProvider;
use crate::common::sample_route;
use crate::common::state_with;

/// Starts a server on an ephemeral port and returns its address.
async fn spawn_server(audit: Arc<RecordingSink>, max_body_bytes: usize) -> SocketAddr {
    let provider = Arc::new(StubProvider::ok(sample_route()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = TripPlannerServer::new(addr, state_with(provider, audit, max_body_bytes));
    tokio::spawn(server.serve_listener(listener));
    addr
}

async fn read_json(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok() {
    let addr = spawn_server(Arc::new(RecordingSink::default()), 4096).await;
    let response = reqwest::Client::new().get(format!("http://{addr}/health")).send().await.unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_trip_over_http() {
    let audit = Arc::new(RecordingSink::default());
    let addr = spawn_server(Arc::clone(&audit), 4096).await;
    let request = json!({
        "current_location": "40.7128,-74.0060",
        "pickup_location": "39.9526,-75.1652",
        "dropoff_location": "38.9072,-77.0369",
        "current_cycle_used": 10,
    });
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/plan-trip"))
        .header("content-type", "application/json")
        .body(request.to_string())
        .send()
        .await
        .unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["distance"], 600.0);
    assert!(body["start_time"].is_string());
    let event = audit.last();
    assert_eq!(event.outcome, PlanOutcome::Ok);
    assert_eq!(event.peer_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_trip_rejects_oversized_body() {
    let addr = spawn_server(Arc::new(RecordingSink::default()), 64).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/plan-trip"))
        .body("x".repeat(65))
        .send()
        .await
        .unwrap();
    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "request body too large" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_trip_rejects_body_far_over_limit_with_json() {
    let audit = Arc::new(RecordingSink::default());
    let addr = spawn_server(Arc::clone(&audit), 64).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/plan-trip"))
        .header("content-type", "application/json")
        .body("x".repeat(640))
        .send()
        .await
        .unwrap();
    let content_type = response.headers().get("content-type").cloned();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body, json!({ "error": "request body too large" }));
    assert_eq!(content_type.unwrap().to_str().unwrap(), "application/json");
    let event = audit.last();
    assert_eq!(event.outcome, PlanOutcome::Rejected);
    assert_eq!(event.status, 413);
    assert_eq!(event.request_bytes, 640);
    assert_eq!(event.peer_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_trip_accepts_body_at_limit() {
    let audit = Arc::new(RecordingSink::default());
    let addr = spawn_server(Arc::clone(&audit), 64).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/plan-trip"))
        .body("x".repeat(64))
        .send()
        .await
        .unwrap();
    let (status, body) = read_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(audit.last().request_bytes, 64);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_path_is_not_found() {
    let addr = spawn_server(Arc::new(RecordingSink::default()), 4096).await;
    let response =
        reqwest::Client::new().get(format!("http://{addr}/api/other")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
