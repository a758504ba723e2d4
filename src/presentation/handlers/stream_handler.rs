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

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Extension, Path};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use serde_json::json;
use tokio::time::sleep;

use crate::config::settings::Settings;
use crate::domain::models::item::ScrapedItem;
use crate::domain::models::job::JobStatus;
use crate::registry::job_registry::JobRegistry;

/// 任务事件
///
/// SSE通道上推送给订阅方的事件种类
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// 新发现的条目
    Item(ScrapedItem),
    /// 进度更新
    Progress { count: usize },
    /// 任务正常结束，通道随后关闭
    Done { count: usize },
    /// 任务失败或任务不存在，通道随后关闭
    Error { message: String },
}

impl JobEvent {
    /// 转换为SSE事件
    fn into_sse(self) -> Event {
        let (name, data) = match self {
            JobEvent::Item(item) => ("item", json!(item)),
            JobEvent::Progress { count } => ("progress", json!({ "count": count })),
            JobEvent::Done { count } => ("done", json!({ "count": count })),
            JobEvent::Error { message } => ("error", json!({ "message": message })),
        };
        Event::default().event(name).data(data.to_string())
    }
}

/// 任务事件游标
///
/// 每个订阅方持有自己的读游标（已发送条目数），按固定间隔
/// 轮询注册表中的实时任务状态并与游标做差。订阅方从不改写
/// 任务的共享items序列，引擎保持唯一写入方。
pub struct JobEventCursor {
    registry: Arc<JobRegistry>,
    job_id: String,
    poll_interval: Duration,
    sent: usize,
    pending: VecDeque<JobEvent>,
    closed: bool,
}

impl JobEventCursor {
    /// 创建新的任务事件游标
    pub fn new(registry: Arc<JobRegistry>, job_id: String, poll_interval: Duration) -> Self {
        Self {
            registry,
            job_id,
            poll_interval,
            sent: 0,
            pending: VecDeque::new(),
            closed: false,
        }
    }

    /// 取出下一个事件
    ///
    /// 首次调用会补发任务中已有的全部条目。没有新事件时按
    /// 固定间隔轮询；任务到达终态且缓冲排空后返回None，
    /// 通道随之关闭。
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.closed {
                return None;
            }
            self.poll();
            if self.pending.is_empty() && !self.closed {
                sleep(self.poll_interval).await;
            }
        }
    }

    /// 对照游标diff一次实时任务状态
    fn poll(&mut self) {
        let Some(job) = self.registry.get(&self.job_id) else {
            self.pending.push_back(JobEvent::Error {
                message: "Job not found".to_string(),
            });
            self.closed = true;
            return;
        };

        let job = job.read();

        if job.items.len() > self.sent {
            for item in job.items.iter().skip(self.sent) {
                self.pending.push_back(JobEvent::Item(item.clone()));
            }
            self.sent = job.items.len();
            self.pending.push_back(JobEvent::Progress { count: job.count });
        }

        match job.status {
            JobStatus::Running => {}
            JobStatus::Completed => {
                self.pending.push_back(JobEvent::Done { count: job.count });
                self.closed = true;
            }
            JobStatus::Error => {
                let message = job
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string());
                self.pending.push_back(JobEvent::Error { message });
                self.closed = true;
            }
        }
    }
}

/// 订阅指定任务的事件流
///
/// 未知的任务ID得到一个终止error事件后通道关闭，不会创建
/// 任务。客户端断开会丢弃流与游标，轮询随之停止，底层的
/// 抓取任务不受影响。
pub async fn stream_job(
    Path(id): Path<String>,
    Extension(registry): Extension<Arc<JobRegistry>>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let cursor = JobEventCursor::new(
        registry,
        id,
        Duration::from_millis(settings.stream.poll_interval_ms),
    );

    let events = stream::unfold(cursor, |mut cursor| async move {
        cursor
            .next_event()
            .await
            .map(|event| (Ok::<_, Infallible>(event.into_sse()), cursor))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
