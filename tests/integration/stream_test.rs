// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use std::sync::Arc;

use boothsweep::domain::models::item::ScrapedItem;
use boothsweep::registry::job_registry::JobRegistry;

use crate::helpers;

fn server_with(registry: Arc<JobRegistry>) -> TestServer {
    TestServer::new(helpers::test_app(registry)).expect("test server")
}

#[tokio::test]
async fn test_unknown_job_stream_emits_error_and_closes() {
    let registry = Arc::new(JobRegistry::new());
    let server = server_with(registry.clone());

    // The stream terminates after the single error event, so the whole
    // body can be read to the end
    let response = server.get("/v1/scrape/job-missing/stream").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("event: error"));
    assert!(body.contains("Job not found"));
    assert!(!body.contains("event: item"));
    assert!(registry.get("job-missing").is_none());
}

#[tokio::test]
async fn test_stream_replays_finished_job_in_order() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com");
    registry
        .emit("job-1", ScrapedItem::new("Acme Corp", "A12"))
        .await;
    registry
        .emit("job-1", ScrapedItem::new("Globex", "B7"))
        .await;
    registry.mark_completed("job-1");

    let server = server_with(registry);
    let body = server.get("/v1/scrape/job-1/stream").await.text();

    let acme = body.find("Acme Corp").expect("first item replayed");
    let globex = body.find("Globex").expect("second item replayed");
    assert!(acme < globex, "catch-up must preserve discovery order");
    assert!(body.contains("event: progress"));
    assert!(body.contains("event: done"));
    assert!(body.contains(r#"{"count":2}"#));
}

#[tokio::test]
async fn test_stream_for_failed_job_ends_with_error() {
    let registry = Arc::new(JobRegistry::new());
    registry.create("job-1", "https://example.com");
    registry.mark_error("job-1", "Navigation timed out after 60s".to_string());

    let server = server_with(registry);
    let body = server.get("/v1/scrape/job-1/stream").await.text();

    assert!(body.contains("event: error"));
    assert!(body.contains("Navigation timed out after 60s"));
    assert!(!body.contains("event: done"));
}
