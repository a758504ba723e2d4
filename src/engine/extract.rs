// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::adapters::site::SiteAdapter;
use crate::domain::models::item::{ScrapedItem, UNKNOWN_BOOTH};

/// "booth"前缀的展位号模式，如"Booth: A123"
static BOOTH_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)booth[:\s]*([A-Z0-9-]+)").expect("booth label regex"));

/// 单个字母加2~4位数字的展位号模式，如"A12"
static BOOTH_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]\d{2,4})\b").expect("booth code regex"));

/// 裸4~6位数字的展位号模式
static BOOTH_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4,6})\b").expect("booth number regex"));

/// 残留在文本里的HTML标签片段
static TAG_FRAGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag fragment regex"));

/// 从单个卡片元素提取候选条目
///
/// 依次尝试适配器的名称与展位选择器，选择器无效或不匹配时
/// 回退到卡片全文的行拆分与模式匹配。单个选择器的失败只会
/// 让提取转向下一个选择器，绝不中断整个卡片。
///
/// # 参数
///
/// * `card` - 卡片元素
/// * `adapter` - 当前任务解析出的站点适配器
///
/// # 返回值
///
/// * `Some(ScrapedItem)` - 提取出可用的展商名称
/// * `None` - 卡片不包含可用的展商名称，不产出任何条目
pub fn extract_item(card: ElementRef<'_>, adapter: &SiteAdapter) -> Option<ScrapedItem> {
    let raw_name = extract_name(card, adapter.name_selectors).unwrap_or_default();
    let booth = extract_booth(card, adapter.booth_selectors);

    // Strip stray tag fragments that survive as literal text
    let exhibitor = TAG_FRAGMENT_RE
        .replace_all(&raw_name, "")
        .trim()
        .to_string();

    if exhibitor.chars().count() < 2 {
        return None;
    }

    Some(ScrapedItem::new(exhibitor, booth))
}

/// 提取展商名称
///
/// 第一个命中且修剪后长度大于1的选择器文本胜出，多行文本
/// 只保留第一行。全部落空时回退到卡片全文：按行拆分，
/// 丢弃长度不足3的行，取剩下的第一行。
fn extract_name(card: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for sel in selectors {
        // An invalid selector counts as "did not match"
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            let text = element_text(element);
            let trimmed = text.trim();
            if trimmed.chars().count() > 1 {
                return trimmed.lines().next().map(|line| line.trim().to_string());
            }
        }
    }

    let text = element_text(card);
    text.lines()
        .map(str::trim)
        .find(|line| line.chars().count() > 2)
        .map(|line| line.to_string())
}

/// 提取展位号
///
/// 第一个命中且文本非空的选择器胜出。全部落空时在卡片全文上
/// 按优先级尝试展位号模式，仍无匹配则返回哨兵值。
fn extract_booth(card: ElementRef<'_>, selectors: &[&str]) -> String {
    for sel in selectors {
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            let text = element_text(element);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    let text = element_text(card);
    for re in [&*BOOTH_LABEL_RE, &*BOOTH_CODE_RE, &*BOOTH_NUMBER_RE] {
        if let Some(m) = re.captures(&text).and_then(|caps| caps.get(1)) {
            return m.as_str().to_string();
        }
    }

    UNKNOWN_BOOTH.to_string()
}

/// 按行拼接元素的文本节点
///
/// scraper没有浏览器innerText的布局语义，用换行符拼接
/// 文本节点来近似块级子元素的分行效果
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
