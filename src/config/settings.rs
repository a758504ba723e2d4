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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、引擎时序、事件流和Sheets协作方等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 引擎配置
    pub engine: EngineSettings,
    /// 事件流配置
    pub stream: StreamSettings,
    /// Sheets协作方配置
    pub sheets: SheetsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// 页面加载超时时间（秒）
    pub nav_timeout_secs: u64,
    /// 页面加载后的额外静置时间（毫秒），等待延迟渲染的脚本
    pub settle_delay_ms: u64,
    /// 相邻两次条目发送之间的节流间隔（毫秒）
    pub emit_throttle_ms: u64,
}

impl EngineSettings {
    /// 浏览器会话的CDP请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.nav_timeout_secs)
    }
}

/// 事件流配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    /// 订阅方轮询任务状态的间隔（毫秒）
    pub poll_interval_ms: u64,
}

/// Sheets协作方配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsSettings {
    /// Sheets API端点
    pub endpoint: String,
    /// 电子表格ID，未配置时跳过追加
    pub spreadsheet_id: Option<String>,
    /// 访问令牌，令牌的获取流程不在本服务内
    pub access_token: Option<String>,
    /// 追加的目标区间
    pub range: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Engine timings mirror the behavior the directory sites need
            .set_default("engine.nav_timeout_secs", 60)?
            .set_default("engine.settle_delay_ms", 3000)?
            .set_default("engine.emit_throttle_ms", 30)?
            // Default stream settings
            .set_default("stream.poll_interval_ms", 500)?
            // Default Sheets settings
            .set_default("sheets.endpoint", "https://sheets.googleapis.com")?
            .set_default("sheets.range", "Sheet1!A:B")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("BOOTHSWEEP").separator("__"));

        builder.build()?.try_deserialize()
    }
}
