// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::registry::job_registry::{JobRegistry, LiveStatus};

/// 查询当前运行状态
///
/// 返回注册表顺序中第一个运行中任务的计数与最近条目；
/// 没有运行中任务时返回not-running、零计数和空条目。
pub async fn live_status(Extension(registry): Extension<Arc<JobRegistry>>) -> Json<LiveStatus> {
    Json(registry.live_status())
}
