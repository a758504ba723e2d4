// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 引擎错误类型
///
/// 到达这里的错误都是任务级的：导航超时、浏览器进程故障等。
/// 单个选择器或单个卡片的失败在各自的作用域内被吞掉，
/// 不会以该类型出现。
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器会话错误
    #[error("Browser error: {0}")]
    Browser(String),

    /// 页面加载超时
    #[error("Navigation timed out after {0}s")]
    NavigationTimeout(u64),

    /// 其他错误
    #[error("{0}")]
    Other(String),
}
