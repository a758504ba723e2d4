// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use boothsweep::config::settings::SheetsSettings;
use boothsweep::domain::models::item::ScrapedItem;
use boothsweep::domain::sinks::{ItemSink, SinkError};
use boothsweep::infrastructure::sheets::SheetsSink;

fn sink_for(server_uri: String) -> SheetsSink {
    SheetsSink::new(SheetsSettings {
        endpoint: server_uri,
        spreadsheet_id: Some("sheet-1".to_string()),
        access_token: Some("token-1".to_string()),
        range: "Sheet1!A:B".to_string(),
    })
}

#[tokio::test]
async fn test_deliver_appends_one_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-1/values/Sheet1!A:B:append"))
        .and(query_param("valueInputOption", "RAW"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_partial_json(
            serde_json::json!({ "values": [["Acme Corp", "A12"]] }),
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = sink_for(server.uri());
    assert!(sink.is_connected());
    sink.deliver(&ScrapedItem::new("Acme Corp", "A12"))
        .await
        .expect("append should succeed");
}

#[tokio::test]
async fn test_deliver_surfaces_a_rejected_append() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let sink = sink_for(server.uri());
    let result = sink.deliver(&ScrapedItem::new("Acme Corp", "A12")).await;
    assert!(matches!(result, Err(SinkError::Rejected(_))));
}

#[tokio::test]
async fn test_unconfigured_sink_skips_the_append() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sink = SheetsSink::new(SheetsSettings {
        endpoint: server.uri(),
        spreadsheet_id: None,
        access_token: None,
        range: "Sheet1!A:B".to_string(),
    });
    assert!(!sink.is_connected());
    sink.deliver(&ScrapedItem::new("Acme Corp", "A12"))
        .await
        .expect("skip must look like success");
}
