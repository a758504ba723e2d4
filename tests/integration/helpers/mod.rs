// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{Extension, Router};
use std::sync::Arc;

use boothsweep::config::settings::{
    EngineSettings, ServerSettings, Settings, SheetsSettings, StreamSettings,
};
use boothsweep::domain::sinks::ItemSink;
use boothsweep::engine::scrape_engine::ScrapeEngine;
use boothsweep::infrastructure::sheets::SheetsSink;
use boothsweep::presentation::routes;
use boothsweep::registry::job_registry::JobRegistry;

/// 测试用配置，时序调小让轮询测试跑得快
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        engine: EngineSettings {
            nav_timeout_secs: 5,
            settle_delay_ms: 0,
            emit_throttle_ms: 0,
        },
        stream: StreamSettings {
            poll_interval_ms: 10,
        },
        sheets: SheetsSettings {
            endpoint: "https://sheets.googleapis.com".to_string(),
            spreadsheet_id: None,
            access_token: None,
            range: "Sheet1!A:B".to_string(),
        },
    }
}

/// 用注入的注册表搭建完整的应用路由
///
/// 注册表由调用方持有，测试可以直接预置任务状态
pub fn test_app(registry: Arc<JobRegistry>) -> Router {
    let settings = Arc::new(test_settings());
    let sink: Arc<dyn ItemSink> = Arc::new(SheetsSink::new(settings.sheets.clone()));
    let engine = Arc::new(ScrapeEngine::new(registry.clone(), settings.engine.clone()));

    routes::routes()
        .layer(Extension(engine))
        .layer(Extension(registry))
        .layer(Extension(sink))
        .layer(Extension(settings))
}
