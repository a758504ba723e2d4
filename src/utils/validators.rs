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

use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug)]
pub enum ValidationError {
    /// URL无效
    #[error("Invalid URL")]
    InvalidUrl,
    /// 不支持的协议
    #[error("Unsupported URL scheme")]
    UnsupportedScheme,
}

/// 验证抓取目标URL
///
/// 验证在任何任务创建之前同步完成，失败的请求不会留下任务。
///
/// # 参数
///
/// * `url` - URL字符串
///
/// # 返回值
///
/// * `Ok(())` - URL有效
/// * `Err(ValidationError)` - URL无法解析或协议不受支持
pub fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ValidationError::UnsupportedScheme),
    }
}
