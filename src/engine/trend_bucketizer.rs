// ==========================================
// 库存监控驾驶舱 - 趋势分桶引擎
// ==========================================
// 职责: 按时间窗口过滤趋势序列，产出图表数据
// 输入: 远端趋势序列（假定按日期升序）+ 窗口
// 输出: 日期 >= (now - 窗口天数) 的子序列，保持原顺序
// 红线: 非增量，每次窗口变化全量重算；无点命中返回空序列而非错误
// ==========================================

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trend::{ChartPoint, TrendPoint};
use crate::domain::types::TrendWindow;

/// 默认窄屏断点（像素）
pub const DEFAULT_NARROW_BREAKPOINT_PX: u32 = 768;

// ==========================================
// 纯函数入口
// ==========================================

/// 以当前时刻为参考进行分桶
pub fn bucketize(series: &[TrendPoint], window: TrendWindow) -> Vec<TrendPoint> {
    bucketize_at(series, window, Utc::now())
}

/// 以指定参考时刻进行分桶
///
/// 点的日期按当天 UTC 零点解释，与 `now - window` 的截止时刻比较。
pub fn bucketize_at(
    series: &[TrendPoint],
    window: TrendWindow,
    now: DateTime<Utc>,
) -> Vec<TrendPoint> {
    let cutoff = now - Duration::days(window.days());

    series
        .iter()
        .filter(|p| Utc.from_utc_datetime(&p.date.and_time(NaiveTime::default())) >= cutoff)
        .cloned()
        .collect()
}

/// 投影为图表点
pub fn to_chart_points(series: &[TrendPoint]) -> Vec<ChartPoint> {
    series.iter().map(ChartPoint::from).collect()
}

// ==========================================
// ChartWindowState - 图表窗口选择状态
// ==========================================

/// 图表窗口选择
///
/// 窄屏时默认窗口由 90 天收紧到 7 天：仅在"宽 → 窄"（或首次观测为窄）时触发一次，
/// 变宽不会恢复；用户手动选择始终生效。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartWindowState {
    window: TrendWindow,
    narrow: Option<bool>,
    breakpoint_px: u32,
}

impl ChartWindowState {
    pub fn new(default_window: TrendWindow, breakpoint_px: u32) -> Self {
        Self {
            window: default_window,
            narrow: None,
            breakpoint_px,
        }
    }

    pub fn window(&self) -> TrendWindow {
        self.window
    }

    pub fn is_narrow(&self) -> bool {
        self.narrow.unwrap_or(false)
    }

    /// 用户手动选择窗口
    pub fn select(&mut self, window: TrendWindow) {
        tracing::debug!(from = %self.window, to = %window, "趋势窗口手动切换");
        self.window = window;
    }

    /// 观测布局宽度
    ///
    /// # 返回
    /// - true: 本次观测触发了自动收紧
    pub fn observe_layout_width(&mut self, width_px: u32) -> bool {
        let now_narrow = width_px < self.breakpoint_px;
        let was_narrow = self.narrow.unwrap_or(false);
        self.narrow = Some(now_narrow);

        if now_narrow && !was_narrow {
            tracing::debug!(width_px, "窄屏布局，趋势窗口自动收紧为 7 天");
            self.window = TrendWindow::Days7;
            return true;
        }
        false
    }

    /// 当前窗口下的图表数据
    pub fn chart_points(&self, series: &[TrendPoint], now: DateTime<Utc>) -> Vec<ChartPoint> {
        to_chart_points(&bucketize_at(series, self.window, now))
    }
}

impl Default for ChartWindowState {
    fn default() -> Self {
        Self::new(TrendWindow::Days90, DEFAULT_NARROW_BREAKPOINT_PX)
    }
}
