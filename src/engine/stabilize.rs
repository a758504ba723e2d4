// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chromiumoxide::Page;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::adapters::site::SiteAdapter;

use super::errors::EngineError;

/// 连续未增长达到该次数时认为页面内容已全部加载
const STABLE_STREAK_THRESHOLD: u32 = 3;

/// 稳定性跟踪器
///
/// 记录卡片数量的高水位与连续未增长次数。无限滚动页面
/// 没有明确的"列表结束"信号，该跟踪器用有界的尝试次数
/// 换取加载完整性。
#[derive(Debug, Default)]
pub struct StabilityTracker {
    high_water: u64,
    streak: u32,
}

impl StabilityTracker {
    /// 创建新的跟踪器
    pub fn new() -> Self {
        Self::default()
    }

    /// 观察一次卡片数量
    ///
    /// 数量超过高水位时重置连续计数并更新高水位，
    /// 否则连续计数加一。
    ///
    /// # 参数
    ///
    /// * `count` - 当前匹配卡片选择器的元素数量
    ///
    /// # 返回值
    ///
    /// 数量已连续三次未增长时返回true
    pub fn observe(&mut self, count: u64) -> bool {
        if count > self.high_water {
            self.high_water = count;
            self.streak = 0;
        } else {
            self.streak += 1;
        }
        self.streak >= STABLE_STREAK_THRESHOLD
    }

    /// 获取观察到的最大卡片数量
    pub fn high_water(&self) -> u64 {
        self.high_water
    }
}

/// 滚动页面直至卡片数量稳定
///
/// 重复滚动到页面底部并等待，直到卡片数量连续三次未增长，
/// 或滚动尝试次数耗尽。
///
/// # 参数
///
/// * `page` - 会话页面
/// * `adapter` - 提供卡片选择器与滚动策略的适配器
///
/// # 返回值
///
/// * `Ok(u64)` - 观察到的最大卡片数量
/// * `Err(EngineError)` - 浏览器交互失败
pub async fn stabilize(page: &Page, adapter: &SiteAdapter) -> Result<u64, EngineError> {
    let mut tracker = StabilityTracker::new();

    for attempt in 0..adapter.max_scroll_attempts {
        page.evaluate("window.scrollTo(0, document.body.scrollHeight);")
            .await
            .map_err(|e| EngineError::Browser(e.to_string()))?;
        sleep(Duration::from_millis(adapter.scroll_pause_ms)).await;

        let count = count_cards(page, adapter.card_selector).await?;
        debug!("Scroll attempt {}: {} cards visible", attempt + 1, count);

        if tracker.observe(count) {
            info!("Scroll stabilized at {} cards", tracker.high_water());
            return Ok(tracker.high_water());
        }
    }

    info!(
        "Scroll attempts exhausted at {} cards",
        tracker.high_water()
    );
    Ok(tracker.high_water())
}

/// 统计页面上匹配卡片选择器的元素数量
async fn count_cards(page: &Page, card_selector: &str) -> Result<u64, EngineError> {
    // The selector goes through a JSON string literal so quoting inside
    // attribute selectors survives the round trip into the page
    let quoted =
        serde_json::to_string(card_selector).map_err(|e| EngineError::Other(e.to_string()))?;
    let count = page
        .evaluate(format!("document.querySelectorAll({}).length", quoted))
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?
        .into_value::<u64>()
        .map_err(|e| EngineError::Other(e.to_string()))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_resets_the_streak() {
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(5));
        assert!(!tracker.observe(9));
        assert!(!tracker.observe(9));
        assert!(!tracker.observe(9));
        // Third consecutive non-growing observation terminates the loop
        assert!(tracker.observe(9));
        assert_eq!(tracker.high_water(), 9);
    }

    #[test]
    fn test_monotone_growth_never_stabilizes() {
        let mut tracker = StabilityTracker::new();
        for count in 1..100u64 {
            assert!(!tracker.observe(count));
        }
        assert_eq!(tracker.high_water(), 99);
    }

    #[test]
    fn test_empty_page_stabilizes_quickly() {
        // A page with no matching cards settles after three observations
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(0));
        assert!(!tracker.observe(0));
        assert!(tracker.observe(0));
    }

    #[test]
    fn test_shrinking_count_counts_as_non_growth() {
        let mut tracker = StabilityTracker::new();
        assert!(!tracker.observe(10));
        assert!(!tracker.observe(8));
        assert!(!tracker.observe(8));
        assert!(tracker.observe(8));
        // High-water mark keeps the peak, not the latest count
        assert_eq!(tracker.high_water(), 10);
    }
}
