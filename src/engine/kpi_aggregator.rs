// ==========================================
// 库存监控驾驶舱 - KPI 聚合引擎
// ==========================================
// 职责: 从 KPI 快照派生百分比指标、趋势方向与四张汇总卡片
// 红线: 阈值为固定设计常量，不可配置
// 红线: 除零/非有限值一律归零，不产出 NaN/Infinity
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::trend::KpiSnapshot;
use crate::domain::types::TrendDirection;
use crate::i18n::t;

/// 满足率"上行"阈值（%）
pub const FILL_RATE_UP_THRESHOLD: f64 = 80.0;
/// 需求"上行"阈值（需求 / 库存）
pub const DEMAND_PRESSURE_RATIO: f64 = 0.7;
/// 库存卡片徽标基准（满足率）
pub const STOCK_BADGE_BASELINE: f64 = 75.0;
/// 满足率卡片徽标基准
pub const FILL_RATE_BADGE_BASELINE: f64 = 85.0;
/// 利用率基准
pub const UTILIZATION_BASELINE: f64 = 70.0;
/// 利用率最优区间
pub const UTILIZATION_OPTIMAL_MIN: f64 = 60.0;
pub const UTILIZATION_OPTIMAL_MAX: f64 = 80.0;

/// 聚合结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiView {
    pub stock_utilization_pct: f64,
    pub stock_trend: TrendDirection,
    pub demand_trend: TrendDirection,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 归一化快照：非有限值置 0
pub fn normalize(snapshot: &KpiSnapshot) -> KpiSnapshot {
    KpiSnapshot {
        total_stock: finite_or_zero(snapshot.total_stock),
        total_demand: finite_or_zero(snapshot.total_demand),
        fill_rate: finite_or_zero(snapshot.fill_rate),
    }
}

/// 聚合 KPI 快照
pub fn aggregate(snapshot: &KpiSnapshot) -> KpiView {
    let s = normalize(snapshot);

    let stock_utilization_pct = if s.total_stock > 0.0 {
        finite_or_zero(s.total_demand / s.total_stock * 100.0)
    } else {
        0.0
    };

    KpiView {
        stock_utilization_pct,
        stock_trend: TrendDirection::from_bool(s.fill_rate >= FILL_RATE_UP_THRESHOLD),
        demand_trend: TrendDirection::from_bool(
            s.total_demand > s.total_stock * DEMAND_PRESSURE_RATIO,
        ),
    }
}

/// 远端返回列表，仅消费第一个元素；空列表按全零快照处理
pub fn aggregate_first(snapshots: &[KpiSnapshot]) -> (KpiSnapshot, KpiView) {
    let snapshot = snapshots.first().map(normalize).unwrap_or_default();
    (snapshot, aggregate(&snapshot))
}

// ==========================================
// KPI 卡片
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiCardKind {
    TotalStock,
    TotalDemand,
    FillRate,
    StockUtilization,
}

/// 汇总卡片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub kind: KpiCardKind,
    pub title: String,
    /// 主数值文本
    pub value: String,
    pub trend: TrendDirection,
    /// 徽标文本（如 "+5.0%"）
    pub badge: String,
    pub headline: String,
    pub caption: String,
}

fn badge(sign_up: bool, delta: f64) -> String {
    format!("{}{:.1}%", if sign_up { '+' } else { '-' }, delta.abs())
}

/// 千分位格式（整数部分），小数最多保留 3 位
pub fn format_thousands(value: f64) -> String {
    let value = finite_or_zero(value);
    // 先整体舍入到千分位，进位落到整数部分
    let scaled = (value.abs() * 1000.0).round() as u64;
    let negative = value < 0.0 && scaled > 0;
    let int_part = scaled / 1000;
    let frac_part = scaled % 1000;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = if frac_part == 0 {
        String::new()
    } else {
        format!(".{:03}", frac_part).trim_end_matches('0').to_string()
    };

    format!("{}{}{}", if negative { "-" } else { "" }, grouped, frac)
}

/// 生成四张汇总卡片
pub fn kpi_cards(snapshot: &KpiSnapshot) -> Vec<KpiCard> {
    let s = normalize(snapshot);
    let view = aggregate(&s);
    let util = view.stock_utilization_pct;
    let stock_up = view.stock_trend == TrendDirection::Up;
    let demand_up = view.demand_trend == TrendDirection::Up;
    let util_optimal = (UTILIZATION_OPTIMAL_MIN..=UTILIZATION_OPTIMAL_MAX).contains(&util);

    vec![
        KpiCard {
            kind: KpiCardKind::TotalStock,
            title: t("kpi.total_stock.title"),
            value: format_thousands(s.total_stock),
            trend: view.stock_trend,
            badge: badge(stock_up, s.fill_rate - STOCK_BADGE_BASELINE),
            headline: t(if stock_up {
                "kpi.total_stock.healthy"
            } else {
                "kpi.total_stock.attention"
            }),
            caption: t("kpi.total_stock.caption"),
        },
        KpiCard {
            kind: KpiCardKind::TotalDemand,
            title: t("kpi.total_demand.title"),
            value: format_thousands(s.total_demand),
            trend: view.demand_trend,
            badge: badge(demand_up, util - UTILIZATION_BASELINE),
            headline: t(if demand_up {
                "kpi.total_demand.high"
            } else {
                "kpi.total_demand.stable"
            }),
            caption: t("kpi.total_demand.caption"),
        },
        KpiCard {
            kind: KpiCardKind::FillRate,
            title: t("kpi.fill_rate.title"),
            value: format!("{:.1}%", s.fill_rate),
            trend: view.stock_trend,
            badge: badge(stock_up, s.fill_rate - FILL_RATE_BADGE_BASELINE),
            headline: t(if stock_up {
                "kpi.fill_rate.excellent"
            } else {
                "kpi.fill_rate.attention"
            }),
            caption: t("kpi.fill_rate.caption"),
        },
        KpiCard {
            kind: KpiCardKind::StockUtilization,
            title: t("kpi.utilization.title"),
            value: format!("{:.1}%", util),
            trend: TrendDirection::from_bool(util_optimal),
            // 符号按是否高于基准，趋势按是否落在最优区间，两者口径不同
            badge: badge(util >= UTILIZATION_BASELINE, util - UTILIZATION_BASELINE),
            headline: t(if util_optimal {
                "kpi.utilization.optimal"
            } else {
                "kpi.utilization.review"
            }),
            caption: t("kpi.utilization.caption"),
        },
    ]
}
