// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::domain::models::item::ScrapedItem;
use crate::domain::models::job::ScrapeJob;
use crate::domain::sinks::ItemSink;

/// 共享的任务引用
///
/// 同一个任务ID在其整个生命周期内映射到同一个对象，
/// 缓存了引用的读取方会持续观察到实时变更
pub type SharedJob = Arc<RwLock<ScrapeJob>>;

/// 当前运行状态快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatus {
    /// 是否有任务正在运行
    pub running: bool,
    /// 运行中任务的条目计数
    pub count: usize,
    /// 运行中任务最近发现的条目
    pub last_item: Option<ScrapedItem>,
}

/// 任务注册表与事件发送路径
///
/// 在进程启动时创建一次并注入到所有需要它的组件，生命周期内
/// 不会被销毁，任务也没有过期回收。每个任务的items序列只有
/// 其所属引擎实例经由emit追加；流式读取方只持有私有读游标，
/// 绝不改写共享序列。
pub struct JobRegistry {
    /// 任务表
    jobs: DashMap<String, SharedJob>,
    /// 接收器表，任务运行期间按任务ID注册
    sinks: DashMap<String, Arc<dyn ItemSink>>,
}

impl JobRegistry {
    /// 创建新的任务注册表实例
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            sinks: DashMap::new(),
        }
    }

    /// 注册一个新任务，初始状态为Running
    ///
    /// # 参数
    ///
    /// * `id` - 任务标识符
    /// * `url` - 目标URL
    ///
    /// # 返回值
    ///
    /// 新任务的共享引用
    pub fn create(&self, id: &str, url: &str) -> SharedJob {
        let job = Arc::new(RwLock::new(ScrapeJob::new(id, url)));
        self.jobs.insert(id.to_string(), job.clone());
        job
    }

    /// 查找任务
    pub fn get(&self, id: &str) -> Option<SharedJob> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    /// 列出全部任务
    pub fn list(&self) -> Vec<SharedJob> {
        self.jobs.iter().map(|entry| entry.value().clone()).collect()
    }

    /// 注册条目接收器
    pub fn register_sink(&self, id: &str, sink: Arc<dyn ItemSink>) {
        self.sinks.insert(id.to_string(), sink);
    }

    /// 注销条目接收器
    pub fn remove_sink(&self, id: &str) {
        self.sinks.remove(id);
    }

    /// 发送一条新发现的条目
    ///
    /// 任务运行期间items/count/last_item的唯一变更路径，只允许
    /// 任务所属的引擎实例调用。追加在写锁内完成，锁不跨越投递
    /// 的挂起点。接收器的失败只记录日志，任务继续。
    pub async fn emit(&self, id: &str, item: ScrapedItem) {
        let Some(job) = self.get(id) else {
            warn!("Emit for unknown job {}", id);
            return;
        };

        {
            let mut job = job.write();
            job.push_item(item.clone());
        }

        let sink = self.sinks.get(id).map(|entry| entry.value().clone());
        if let Some(sink) = sink {
            if let Err(e) = sink.deliver(&item).await {
                warn!("Sink {} failed to deliver item: {}", sink.name(), e);
            }
        }
    }

    /// 将任务推进到Completed
    pub fn mark_completed(&self, id: &str) {
        if let Some(job) = self.get(id) {
            if let Err(e) = job.write().complete() {
                warn!("Job {} refused completion: {}", id, e);
            }
        }
    }

    /// 将任务推进到Error并记录诊断信息
    pub fn mark_error(&self, id: &str, message: String) {
        if let Some(job) = self.get(id) {
            if let Err(e) = job.write().fail(message) {
                warn!("Job {} refused error transition: {}", id, e);
            }
        }
    }

    /// 当前运行状态快照
    ///
    /// 只暴露注册表顺序中找到的第一个运行中任务，多个任务
    /// 并发运行时其余任务不在此出现
    pub fn live_status(&self) -> LiveStatus {
        for entry in self.jobs.iter() {
            let job = entry.value().read();
            if job.is_running() {
                return LiveStatus {
                    running: true,
                    count: job.count,
                    last_item: job.last_item.clone(),
                };
            }
        }

        LiveStatus {
            running: false,
            count: 0,
            last_item: None,
        }
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
