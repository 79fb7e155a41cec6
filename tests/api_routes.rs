//! REST contract tests for the campaign API.
//!
//! Each test builds the real router over a stub transport and drives it
//! through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use mailburst::api::campaign_routes;
use mailburst::campaign::CampaignCoordinator;
use mailburst::channel::{Channel, ChannelDescriptor, RenderedMessage};
use mailburst::store::{JsonFileStore, SnapshotStore};
use mailburst::template::TemplateLibrary;

/// Interval long enough that a spawned loop never ticks during a test.
const PARKED: Duration = Duration::from_secs(3600);

/// Transport stub: every probe and send succeeds.
struct AlwaysOk;

#[async_trait]
impl Channel for AlwaysOk {
    fn name(&self) -> &str {
        "always-ok"
    }
    async fn probe(&self, _descriptor: &ChannelDescriptor) -> bool {
        true
    }
    async fn send(&self, _descriptor: &ChannelDescriptor, _message: &RenderedMessage) -> bool {
        true
    }
}

async fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(dir.path().join("state.json")));
    let templates = TemplateLibrary::new(dir.path().join("templates"));
    let coordinator =
        CampaignCoordinator::restore(store, Arc::new(AlwaysOk), templates, PARKED).await;
    (campaign_routes(coordinator), dir)
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    let request = match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _dir) = app().await;
    let (status, body) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn intake_accepts_and_counts() {
    let (app, _dir) = app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/intake",
        Some(json!({ "addresses": "a@x\n b@x \n\n" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], 2);
}

#[tokio::test]
async fn empty_intake_is_unprocessable() {
    let (app, _dir) = app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/intake",
        Some(json!({ "addresses": "  \n\n" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("no recipients"));
}

#[tokio::test]
async fn channels_report_active_count() {
    let (app, _dir) = app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/channels",
        Some(json!({ "candidates": [
            { "host": "smtp0.example.com", "port": 587 },
            { "host": "smtp1.example.com", "port": 2525 }
        ]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], 2);
}

#[tokio::test]
async fn stats_reflect_the_lifecycle() {
    let (app, _dir) = app().await;
    request(
        &app,
        "POST",
        "/api/intake",
        Some(json!({ "addresses": "a@x\nb@x" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/api/channels",
        Some(json!({ "candidates": [{ "host": "smtp0.example.com", "port": 587 }] })),
    )
    .await;

    let (status, body) = request(&app, "GET", "/api/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "channels_ready");
    assert_eq!(body["leads_parsed"], 2);
    assert_eq!(body["recipients_remaining"], 2);
    assert_eq!(body["active_channel_count"], 1);
    assert_eq!(body["success_rate"], 0.0);
    assert_eq!(body["stats"]["queued_total"], 2);
    assert_eq!(body["templates"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn stats_are_idempotent() {
    let (app, _dir) = app().await;
    request(
        &app,
        "POST",
        "/api/intake",
        Some(json!({ "addresses": "a@x" })),
    )
    .await;

    let (_, first) = request(&app, "GET", "/api/stats", None).await;
    let (_, second) = request(&app, "GET", "/api/stats", None).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn second_dispatch_start_conflicts() {
    let (app, _dir) = app().await;
    request(
        &app,
        "POST",
        "/api/intake",
        Some(json!({ "addresses": "a@x" })),
    )
    .await;
    request(
        &app,
        "POST",
        "/api/channels",
        Some(json!({ "candidates": [{ "host": "smtp0.example.com", "port": 587 }] })),
    )
    .await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/dispatch",
        Some(json!({ "template": "welcome" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accepted"], true);

    let (status, _) = request(
        &app,
        "POST",
        "/api/dispatch",
        Some(json!({ "template": "survey" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = request(&app, "POST", "/api/dispatch/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stopped"], true);
}

#[tokio::test]
async fn unknown_template_on_dispatch_is_unprocessable() {
    let (app, _dir) = app().await;
    let (status, body) = request(
        &app,
        "POST",
        "/api/dispatch",
        Some(json!({ "template": "nonsense" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("nonsense"));
}

#[tokio::test]
async fn template_catalog_lists_every_entry() {
    let (app, _dir) = app().await;
    let (status, body) = request(&app, "GET", "/api/templates", None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"welcome"));
    assert!(ids.contains(&"product-launch"));
}

#[tokio::test]
async fn template_content_falls_back_to_stub() {
    let (app, _dir) = app().await;

    // Known id without a backing file → stub.
    let (status, body) = request(&app, "GET", "/api/templates/welcome", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_str().unwrap().contains("{{target}}"));

    // Unknown id → same stub contract.
    let (status, body) = request(&app, "GET", "/api/templates/not-a-template", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_str().unwrap().contains("{{target}}"));
}
