// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use boothsweep::domain::models::item::ScrapedItem;
use boothsweep::registry::job_registry::JobRegistry;

use crate::helpers;

fn server_with(registry: Arc<JobRegistry>) -> TestServer {
    TestServer::new(helpers::test_app(registry)).expect("test server")
}

#[tokio::test]
async fn test_health_check() {
    let server = server_with(Arc::new(JobRegistry::new()));
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_version_returns_crate_version() {
    let server = server_with(Arc::new(JobRegistry::new()));
    let response = server.get("/v1/version").await;
    response.assert_status_ok();
    assert_eq!(response.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_create_scrape_rejects_missing_url() {
    let registry = Arc::new(JobRegistry::new());
    let server = server_with(registry.clone());

    let response = server.post("/v1/scrape").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    // A rejected request must not leave a job behind
    assert!(registry.list().is_empty());
}

#[tokio::test]
async fn test_create_scrape_rejects_blank_url() {
    let server = server_with(Arc::new(JobRegistry::new()));
    let response = server.post("/v1/scrape").json(&json!({ "url": "   " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_scrape_rejects_malformed_url() {
    let registry = Arc::new(JobRegistry::new());
    let server = server_with(registry.clone());

    let response = server
        .post("/v1/scrape")
        .json(&json!({ "url": "not a url" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(registry.list().is_empty());
}

#[tokio::test]
async fn test_unknown_job_status_is_not_found() {
    let server = server_with(Arc::new(JobRegistry::new()));
    let response = server.get("/v1/jobs/job-does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_job_status_exposes_the_record_fields() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com/exhibitors");
    registry
        .emit("job-1", ScrapedItem::new("Acme Corp", "A12"))
        .await;
    registry.mark_completed("job-1");

    let server = server_with(registry);
    let response = server.get("/v1/jobs/job-1").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["id"], json!("job-1"));
    assert_eq!(body["status"], json!("completed"));
    assert_eq!(body["count"], json!(1));
    assert_eq!(body["lastItem"]["exhibitor"], json!("Acme Corp"));
    assert_eq!(body["lastItem"]["booth"], json!("A12"));
    assert_eq!(body["error"], Value::Null);
}

#[tokio::test]
async fn test_failed_job_status_carries_the_message() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com");
    registry.mark_error("job-1", "Browser error: launch failed".to_string());

    let server = server_with(registry);
    let body: Value = server.get("/v1/jobs/job-1").await.json();
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["error"], json!("Browser error: launch failed"));
}

#[tokio::test]
async fn test_live_status_with_no_jobs() {
    let server = server_with(Arc::new(JobRegistry::new()));
    let body: Value = server.get("/v1/status").await.json();
    assert_eq!(body["running"], json!(false));
    assert_eq!(body["count"], json!(0));
    assert_eq!(body["lastItem"], Value::Null);
}

#[tokio::test]
async fn test_live_status_reports_the_running_job() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com");
    registry
        .emit("job-1", ScrapedItem::new("Acme Corp", "A12"))
        .await;
    registry
        .emit("job-1", ScrapedItem::new("Globex", "B7"))
        .await;

    let server = server_with(registry);
    let body: Value = server.get("/v1/status").await.json();
    assert_eq!(body["running"], json!(true));
    assert_eq!(body["count"], json!(2));
    assert_eq!(body["lastItem"]["exhibitor"], json!("Globex"));
}

#[tokio::test]
async fn test_completed_job_is_not_reported_as_running() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com");
    registry.mark_completed("job-1");

    let server = server_with(registry);
    let body: Value = server.get("/v1/status").await.json();
    assert_eq!(body["running"], json!(false));
}
