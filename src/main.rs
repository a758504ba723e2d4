// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use boothsweep::config::settings::Settings;
use boothsweep::domain::sinks::ItemSink;
use boothsweep::engine::scrape_engine::ScrapeEngine;
use boothsweep::infrastructure::sheets::SheetsSink;
use boothsweep::presentation::routes;
use boothsweep::registry::job_registry::JobRegistry;
use boothsweep::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting boothsweep...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Job registry lives for the whole process and is injected
    // everywhere; jobs are never expired
    let registry = Arc::new(JobRegistry::new());

    // 4. Item sink for the spreadsheet collaborator
    let sheets = SheetsSink::new(settings.sheets.clone());
    if sheets.is_connected() {
        info!("Sheets sink configured");
    } else {
        info!("Sheets sink not configured, items will not be appended");
    }
    let sink: Arc<dyn ItemSink> = Arc::new(sheets);

    // 5. Scrape engine
    let engine = Arc::new(ScrapeEngine::new(registry.clone(), settings.engine.clone()));

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(engine))
        .layer(Extension(registry))
        .layer(Extension(sink))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
