// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::config::settings::SheetsSettings;
use crate::domain::models::item::ScrapedItem;
use crate::domain::sinks::{ItemSink, SinkError};

/// Google Sheets追加客户端
///
/// 每条唯一条目以一行`[exhibitor, booth]`追加到配置的
/// 电子表格区间。未配置凭据时跳过追加，投递失败交由发送
/// 路径记录日志，绝不影响抓取任务本身。令牌的获取与刷新
/// 流程由部署方负责。
pub struct SheetsSink {
    client: reqwest::Client,
    settings: SheetsSettings,
}

impl SheetsSink {
    /// 创建新的Sheets接收器实例
    pub fn new(settings: SheetsSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// 判断是否已配置电子表格凭据
    pub fn is_connected(&self) -> bool {
        self.settings.spreadsheet_id.is_some() && self.settings.access_token.is_some()
    }

    fn append_url(&self, spreadsheet_id: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}:append?valueInputOption=RAW",
            self.settings.endpoint.trim_end_matches('/'),
            spreadsheet_id,
            self.settings.range
        )
    }
}

#[async_trait]
impl ItemSink for SheetsSink {
    /// 追加一行到电子表格
    ///
    /// # 参数
    ///
    /// * `item` - 新发现的条目
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 追加成功，或未配置凭据而跳过
    /// * `Err(SinkError)` - 请求失败或被下游拒绝
    async fn deliver(&self, item: &ScrapedItem) -> Result<(), SinkError> {
        let (Some(spreadsheet_id), Some(token)) =
            (&self.settings.spreadsheet_id, &self.settings.access_token)
        else {
            debug!("Sheets sink not configured, skipping append");
            return Ok(());
        };

        let body = json!({ "values": [[item.exhibitor, item.booth]] });
        let response = self
            .client
            .post(self.append_url(spreadsheet_id))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SinkError::Rejected(format!(
                "append returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "sheets"
    }
}
