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

use chromiumoxide::Page;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::adapters::registry::resolve;
use crate::adapters::site::SiteAdapter;
use crate::config::settings::EngineSettings;
use crate::domain::models::item::ScrapedItem;
use crate::domain::sinks::ItemSink;
use crate::registry::job_registry::JobRegistry;

use super::browser::BrowserSession;
use super::errors::EngineError;
use super::extract;
use super::stabilize;

/// 抓取任务引擎
///
/// 编排一次完整的抓取运行：解析适配器、加载页面、滚动稳定、
/// 枚举卡片、提取、去重并节流发送。任务状态的全部变更都经由
/// 注入的任务注册表完成。
pub struct ScrapeEngine {
    registry: Arc<JobRegistry>,
    settings: EngineSettings,
}

impl ScrapeEngine {
    /// 创建新的抓取引擎实例
    ///
    /// # 参数
    ///
    /// * `registry` - 进程级任务注册表
    /// * `settings` - 引擎时序配置
    pub fn new(registry: Arc<JobRegistry>, settings: EngineSettings) -> Self {
        Self { registry, settings }
    }

    /// 启动一个分离的抓取任务
    ///
    /// 同步注册任务与接收器后立即返回，抓取在派生的后台任务中
    /// 进行。调用方不等待其完成，任务从调用方视角可以无限期
    /// 停留在Running状态。
    ///
    /// # 参数
    ///
    /// * `job_id` - 新铸的任务标识符
    /// * `url` - 目标URL
    /// * `sink` - 每条唯一条目的投递目标
    pub fn start(self: Arc<Self>, job_id: String, url: String, sink: Arc<dyn ItemSink>) {
        self.registry.create(&job_id, &url);
        self.registry.register_sink(&job_id, sink);

        tokio::spawn(async move {
            self.run(job_id, url).await;
        });
    }

    /// 运行已注册的任务直至终态
    ///
    /// 成功时任务推进到Completed，任何逃逸出抓取步骤的错误
    /// 都把任务推进到Error并记录诊断信息。没有自动重试，
    /// 失败的任务只能以新的任务ID重新发起。
    #[instrument(skip(self), fields(job_id = %job_id, url = %url))]
    async fn run(&self, job_id: String, url: String) {
        match self.scrape(&job_id, &url).await {
            Ok(emitted) => {
                info!("Scrape completed with {} unique exhibitors", emitted);
                self.registry.mark_completed(&job_id);
            }
            Err(e) => {
                error!("Scrape failed: {}", e);
                self.registry.mark_error(&job_id, e.to_string());
            }
        }

        self.registry.remove_sink(&job_id);
    }

    async fn scrape(&self, job_id: &str, url: &str) -> Result<usize, EngineError> {
        let adapter = resolve(url);
        info!("Using adapter {} for {}", adapter.name, url);

        let session = BrowserSession::launch(self.settings.request_timeout()).await?;
        // The page work is factored out so the session is released on the
        // failure path as well as the success path
        let outcome = self.drive(session.page(), job_id, adapter, url).await;
        session.shutdown().await;
        outcome
    }

    async fn drive(
        &self,
        page: &Page,
        job_id: &str,
        adapter: &SiteAdapter,
        url: &str,
    ) -> Result<usize, EngineError> {
        let nav_timeout = Duration::from_secs(self.settings.nav_timeout_secs);
        tokio::time::timeout(nav_timeout, page.goto(url))
            .await
            .map_err(|_| EngineError::NavigationTimeout(self.settings.nav_timeout_secs))?
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // goto resolves on the load event; late-rendering scripts get a
        // fixed settle delay on top
        sleep(Duration::from_millis(self.settings.settle_delay_ms)).await;

        stabilize::stabilize(page, adapter).await?;

        let html = page
            .content()
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        let items = collect_items(&html, adapter);
        info!("Extracted {} unique items from page", items.len());

        for item in &items {
            self.registry.emit(job_id, item.clone()).await;
            // Throttle so downstream consumers see a steady trickle
            // instead of a burst
            sleep(Duration::from_millis(self.settings.emit_throttle_ms)).await;
        }

        Ok(items.len())
    }
}

/// 按DOM顺序枚举卡片并提取去重后的条目
///
/// 单个卡片提取失败只会跳过该卡片。scraper的文档类型不是
/// Send，解析与提取在此同步完成，发送阶段不再持有它。
fn collect_items(html: &str, adapter: &SiteAdapter) -> Vec<ScrapedItem> {
    let document = Html::parse_document(html);
    let Ok(card_selector) = Selector::parse(adapter.card_selector) else {
        warn!("Card selector {:?} failed to parse", adapter.card_selector);
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for card in document.select(&card_selector) {
        let Some(item) = extract::extract_item(card, adapter) else {
            continue;
        };
        if seen.insert(item.dedup_key()) {
            items.push(item);
        }
    }

    items
}
