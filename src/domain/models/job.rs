// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::item::ScrapedItem;

/// 任务状态枚举
///
/// 表示抓取任务在其生命周期中的不同状态。
/// 状态转换恰好发生一次且不可逆：
/// Running → Completed/Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 运行中，抓取正在进行
    #[default]
    Running,
    /// 已完成，枚举与发送正常结束
    Completed,
    /// 已失败，运行期间有未被吞掉的错误
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "error" => Ok(JobStatus::Error),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，终态不会回退也不会重复到达
    #[error("Invalid state transition")]
    InvalidStateTransition,
}

/// 抓取任务实体
///
/// 一次抓取运行的全部可观测状态。任务在注册表中保留至
/// 进程退出，条目序列只追加且保持发现顺序。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeJob {
    /// 任务唯一标识符，对调用方不透明
    pub id: String,
    /// 目标URL
    pub url: String,
    /// 任务状态
    pub status: JobStatus,
    /// 已发现的条目，追加顺序即发现顺序
    pub items: Vec<ScrapedItem>,
    /// 条目计数，任何时刻都等于items的长度
    pub count: usize,
    /// 最近发现的条目
    pub last_item: Option<ScrapedItem>,
    /// 失败时的诊断信息
    pub error: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 到达终态的时间
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScrapeJob {
    /// 创建一个新的抓取任务，初始状态为Running
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            status: JobStatus::Running,
            items: Vec::new(),
            count: 0,
            last_item: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    /// 追加一条新发现的条目
    ///
    /// 只允许通过注册表的发送路径调用，count与items的长度
    /// 在同一次调用内一起推进
    pub(crate) fn push_item(&mut self, item: ScrapedItem) {
        self.items.push(item.clone());
        self.count = self.items.len();
        self.last_item = Some(item);
    }

    /// 完成任务
    ///
    /// 将任务状态从Running变更为Completed
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 转换成功
    /// * `Err(DomainError)` - 任务已处于终态
    pub fn complete(&mut self) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Completed;
                self.finished_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记任务失败
    ///
    /// 将任务状态从Running变更为Error并记录诊断信息
    ///
    /// # 参数
    ///
    /// * `message` - 面向调用方的简短诊断信息
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 转换成功
    /// * `Err(DomainError)` - 任务已处于终态
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Running => {
                self.status = JobStatus::Error;
                self.error = Some(message.into());
                self.finished_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 判断任务是否仍在运行
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}
