// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 适配器种类枚举
///
/// 每个种类对应一个站点族的匹配规则，Generic无条件匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// IMTS展商目录（directory.imts.com）
    Imts,
    /// Interphex展商列表（interphex.com）
    Interphex,
    /// 兜底适配器，匹配所有URL
    Generic,
}

/// 站点适配器
///
/// 编译期静态定义的提取策略配置，不持久化。
/// 选择器列表按优先级排序，提取时依次尝试。
#[derive(Debug)]
pub struct SiteAdapter {
    /// 适配器种类
    pub kind: AdapterKind,
    /// 适配器名称
    pub name: &'static str,
    /// 卡片选择器，每个匹配元素是一条候选记录
    pub card_selector: &'static str,
    /// 展商名称选择器（按优先级排序）
    pub name_selectors: &'static [&'static str],
    /// 展位号选择器（按优先级排序）
    pub booth_selectors: &'static [&'static str],
    /// 最大滚动尝试次数
    pub max_scroll_attempts: u32,
    /// 每次滚动后的等待毫秒数
    pub scroll_pause_ms: u64,
}

impl SiteAdapter {
    /// 判断该适配器是否匹配目标URL
    ///
    /// 纯函数，只依赖URL字符串本身，保证解析的确定性
    pub fn matches(&self, url: &str) -> bool {
        match self.kind {
            AdapterKind::Imts => url.contains("directory.imts.com"),
            AdapterKind::Interphex => url.contains("interphex.com"),
            AdapterKind::Generic => true,
        }
    }
}
