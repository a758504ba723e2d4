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

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::sinks::ItemSink;
use crate::engine::scrape_engine::ScrapeEngine;
use crate::registry::job_registry::JobRegistry;
use crate::utils::validators;

/// 创建抓取请求DTO
#[derive(Debug, Deserialize)]
pub struct CreateScrapeDto {
    /// 目标URL
    pub url: Option<String>,
}

/// 发起一次抓取
///
/// 验证通过后铸造一个新的任务ID并派生后台抓取任务，
/// 本处理器不等待任何提取发生就返回。
pub async fn create_scrape(
    Extension(engine): Extension<Arc<ScrapeEngine>>,
    Extension(sink): Extension<Arc<dyn ItemSink>>,
    Json(payload): Json<CreateScrapeDto>,
) -> impl IntoResponse {
    let url = match payload.url {
        Some(url) if !url.trim().is_empty() => url,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Invalid URL"
                })),
            )
                .into_response();
        }
    };

    if let Err(e) = validators::validate_target_url(&url) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            })),
        )
            .into_response();
    }

    let job_id = format!("job-{}", Uuid::new_v4());
    info!("Starting scrape job {} for {}", job_id, url);

    // The run is a detached background task; this boundary only
    // registers the job and returns the id
    engine.start(job_id.clone(), url, sink);

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "id": job_id,
            "status": "running"
        })),
    )
        .into_response()
}

/// 查询单个任务的状态
pub async fn get_scrape_status(
    Path(id): Path<String>,
    Extension(registry): Extension<Arc<JobRegistry>>,
) -> impl IntoResponse {
    match registry.get(&id) {
        Some(job) => {
            let job = job.read();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "id": job.id,
                    "status": job.status,
                    "count": job.count,
                    "lastItem": job.last_item,
                    "error": job.error,
                })),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "Job not found"
            })),
        )
            .into_response(),
    }
}
