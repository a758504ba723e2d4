// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::item::ScrapedItem;

/// 接收器错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 下游拒绝了投递
    #[error("Append rejected: {0}")]
    Rejected(String),
}

/// 条目接收器特质
///
/// 每条唯一条目在发现时被投递到该接收器恰好一次，
/// 顺序与发现顺序一致。实现方自行管理连接状态，
/// 投递失败由发送路径记录日志，绝不中断抓取任务。
#[async_trait]
pub trait ItemSink: Send + Sync {
    /// 投递一条条目
    async fn deliver(&self, item: &ScrapedItem) -> Result<(), SinkError>;

    /// 获取接收器名称
    fn name(&self) -> &'static str;
}
