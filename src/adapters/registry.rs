// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::site::{AdapterKind, SiteAdapter};

/// IMTS展商目录适配器
pub static IMTS_ADAPTER: SiteAdapter = SiteAdapter {
    kind: AdapterKind::Imts,
    name: "IMTS",
    card_selector: "li.js-Card.card",
    name_selectors: &[".card-Title", "h3", ".company-name", "a span"],
    booth_selectors: &[".booth", "[class*=\"booth\"]"],
    max_scroll_attempts: 100,
    scroll_pause_ms: 2000,
};

/// Interphex展商列表适配器
pub static INTERPHEX_ADAPTER: SiteAdapter = SiteAdapter {
    kind: AdapterKind::Interphex,
    name: "Interphex",
    card_selector: ".m-exhibitors-list__items__item",
    name_selectors: &[
        ".m-exhibitors-list__items__item__header__title",
        "h3",
        "h2",
        ".title",
        ".name",
    ],
    booth_selectors: &[
        ".m-exhibitors-list__items__item__header__stand",
        ".booth",
        ".stand",
        "[class*=\"booth\"]",
        "[class*=\"stand\"]",
    ],
    max_scroll_attempts: 100,
    scroll_pause_ms: 2000,
};

/// 兜底适配器
///
/// 用宽泛的选择器覆盖未知的目录站点，滚动预算较小
pub static GENERIC_ADAPTER: SiteAdapter = SiteAdapter {
    kind: AdapterKind::Generic,
    name: "Generic",
    card_selector: ".exhibitor, .company, .vendor, .directory-item, [class*=\"exhibitor\"], [class*=\"card\"], li.card, .list-item",
    name_selectors: &[
        "h1", "h2", "h3", "h4", ".title", ".name", ".company", ".company-name", "a",
    ],
    booth_selectors: &[".booth", ".stand", ".location", "[class*=\"booth\"]", "[class*=\"stand\"]"],
    max_scroll_attempts: 60,
    scroll_pause_ms: 2000,
};

/// 适配器优先级列表
///
/// resolve按此顺序尝试，第一个匹配的适配器胜出，
/// 末位的Generic保证列表总能命中
static ADAPTERS: [&SiteAdapter; 3] = [&IMTS_ADAPTER, &INTERPHEX_ADAPTER, &GENERIC_ADAPTER];

/// 解析URL对应的站点适配器
///
/// # 参数
///
/// * `url` - 目标URL字符串
///
/// # 返回值
///
/// 匹配的适配器引用，任何URL（包括空串）都会得到一个适配器
pub fn resolve(url: &str) -> &'static SiteAdapter {
    ADAPTERS
        .iter()
        .find(|adapter| adapter.matches(url))
        .copied()
        .unwrap_or(&GENERIC_ADAPTER)
}
