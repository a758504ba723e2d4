// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::errors::EngineError;

/// 目录站点对无头浏览器默认UA的行为不稳定，统一换成桌面UA
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0.0.0 Safari/537.36";

/// 浏览器会话
///
/// 每个抓取任务独占一个浏览器进程和一个页面，任务之间互不
/// 干扰。会话必须在任务的每条退出路径上关闭。
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// 启动新的浏览器会话
    ///
    /// # 参数
    ///
    /// * `request_timeout` - 单个CDP请求的超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(BrowserSession)` - 已打开一个空白页面的会话
    /// * `Err(EngineError)` - 浏览器启动失败
    pub async fn launch(request_timeout: Duration) -> Result<Self, EngineError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(request_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(EngineError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        // Drain browser events until the connection closes
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        page.set_user_agent(USER_AGENT)
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;

        Ok(Self {
            browser,
            handler_task,
            page,
        })
    }

    /// 获取会话页面
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 关闭浏览器会话并回收浏览器进程
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process wait failed: {}", e);
        }
        self.handler_task.abort();
    }
}
