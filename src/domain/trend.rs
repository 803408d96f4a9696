// ==========================================
// 库存监控驾驶舱 - 趋势点 / KPI 快照
// ==========================================
// 职责: 远端拉取后不可变的时间序列与汇总数据
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 趋势点（远端序列被视为事实，只筛选不改写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub stock_value: i64,
    pub demand_value: i64,
}

impl TrendPoint {
    pub fn new(date: NaiveDate, stock_value: i64, demand_value: i64) -> Self {
        Self {
            date,
            stock_value,
            demand_value,
        }
    }
}

/// 图表点（面积图的两条序列：库存 / 需求）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub stock: i64,
    pub demand: i64,
}

impl From<&TrendPoint> for ChartPoint {
    fn from(p: &TrendPoint) -> Self {
        Self {
            date: p.date,
            stock: p.stock_value,
            demand: p.demand_value,
        }
    }
}

/// KPI 快照（每个区间令牌一份）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub total_stock: f64,
    pub total_demand: f64,
    /// 满足率（百分比，0~100）
    pub fill_rate: f64,
}

impl KpiSnapshot {
    pub fn new(total_stock: f64, total_demand: f64, fill_rate: f64) -> Self {
        Self {
            total_stock,
            total_demand,
            fill_rate,
        }
    }
}
