// ==========================================
// 库存监控驾驶舱 - 领域类型定义
// ==========================================
// 职责: 状态等级、筛选口径、列标识、时间窗口等枚举
// 红线: 状态只派生不存储（见 engine::classifier）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产品状态 (Product Status)
// ==========================================
// 由 (stock, demand) 派生: 库存 > 需求 为 healthy，相等为 low，小于为 critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Healthy, // 充足
    Low,     // 紧平衡
    Critical, // 短缺
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Healthy => "healthy",
            ProductStatus::Low => "low",
            ProductStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 状态筛选 (Status Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Healthy,
    Low,
    Critical,
}

impl StatusFilter {
    /// 判断某个状态是否通过筛选
    pub fn matches(&self, status: ProductStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Healthy => status == ProductStatus::Healthy,
            StatusFilter::Low => status == ProductStatus::Low,
            StatusFilter::Critical => status == ProductStatus::Critical,
        }
    }

    /// 从字符串解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "healthy" => Some(StatusFilter::Healthy),
            "low" => Some(StatusFilter::Low),
            "critical" => Some(StatusFilter::Critical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Healthy => "healthy",
            StatusFilter::Low => "low",
            StatusFilter::Critical => "critical",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 排序方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

// ==========================================
// 趋势方向 (KPI 卡片)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    pub fn from_bool(up: bool) -> Self {
        if up {
            TrendDirection::Up
        } else {
            TrendDirection::Down
        }
    }

    /// 徽标符号
    pub fn sign(&self) -> char {
        match self {
            TrendDirection::Up => '+',
            TrendDirection::Down => '-',
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
        }
    }
}

// ==========================================
// 趋势图时间窗口
// ==========================================
// 仅支持 7 / 30 / 90 天三档
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrendWindow {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[default]
    #[serde(rename = "90d")]
    Days90,
}

impl TrendWindow {
    pub const ALL: [TrendWindow; 3] = [TrendWindow::Days90, TrendWindow::Days30, TrendWindow::Days7];

    pub fn days(&self) -> i64 {
        match self {
            TrendWindow::Days7 => 7,
            TrendWindow::Days30 => 30,
            TrendWindow::Days90 => 90,
        }
    }

    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            7 => Some(TrendWindow::Days7),
            30 => Some(TrendWindow::Days30),
            90 => Some(TrendWindow::Days90),
            _ => None,
        }
    }

    /// 区间令牌（"7d" / "30d" / "90d"）
    pub fn range_token(&self) -> &'static str {
        match self {
            TrendWindow::Days7 => "7d",
            TrendWindow::Days30 => "30d",
            TrendWindow::Days90 => "90d",
        }
    }

    pub fn parse_token(token: &str) -> Option<Self> {
        match token.trim() {
            "7d" => Some(TrendWindow::Days7),
            "30d" => Some(TrendWindow::Days30),
            "90d" => Some(TrendWindow::Days90),
            _ => None,
        }
    }

    /// 下拉菜单文案
    pub fn label(&self) -> &'static str {
        match self {
            TrendWindow::Days7 => "Last 7 days",
            TrendWindow::Days30 => "Last 30 days",
            TrendWindow::Days90 => "Last 3 months",
        }
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.range_token())
    }
}

// ==========================================
// 表格列标识
// ==========================================
// 顺序即展示顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Drag,      // 拖拽手柄
    Select,    // 勾选框
    Name,      // 产品名称
    Sku,       // SKU
    Warehouse, // 仓库
    Stock,     // 库存
    Demand,    // 需求（可行内编辑）
    Actions,   // 操作菜单（调拨）
}

impl ColumnId {
    pub const ALL: [ColumnId; 8] = [
        ColumnId::Drag,
        ColumnId::Select,
        ColumnId::Name,
        ColumnId::Sku,
        ColumnId::Warehouse,
        ColumnId::Stock,
        ColumnId::Demand,
        ColumnId::Actions,
    ];

    /// 是否可排序（仅数据列）
    pub fn is_sortable(&self) -> bool {
        matches!(
            self,
            ColumnId::Name | ColumnId::Sku | ColumnId::Warehouse | ColumnId::Stock | ColumnId::Demand
        )
    }

    /// 是否可隐藏（名称列与功能列不可隐藏）
    pub fn is_hideable(&self) -> bool {
        matches!(
            self,
            ColumnId::Sku | ColumnId::Warehouse | ColumnId::Stock | ColumnId::Demand
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnId::Stock | ColumnId::Demand)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Drag => "drag",
            ColumnId::Select => "select",
            ColumnId::Name => "name",
            ColumnId::Sku => "sku",
            ColumnId::Warehouse => "warehouse",
            ColumnId::Stock => "stock",
            ColumnId::Demand => "demand",
            ColumnId::Actions => "actions",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        ColumnId::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 刷新后手工顺序策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManualOrderPolicy {
    /// 保留仍存在行的相对顺序，新行按服务端顺序追加
    #[default]
    Preserve,
    /// 直接采用服务端顺序
    Reset,
}

impl ManualOrderPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PRESERVE" => Some(ManualOrderPolicy::Preserve),
            "RESET" => Some(ManualOrderPolicy::Reset),
            _ => None,
        }
    }
}

impl fmt::Display for ManualOrderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualOrderPolicy::Preserve => write!(f, "PRESERVE"),
            ManualOrderPolicy::Reset => write!(f, "RESET"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(ProductStatus::Critical));
        assert!(StatusFilter::Low.matches(ProductStatus::Low));
        assert!(!StatusFilter::Healthy.matches(ProductStatus::Low));
        assert_eq!(StatusFilter::parse(" Critical "), Some(StatusFilter::Critical));
        assert_eq!(StatusFilter::parse("unknown"), None);
    }

    #[test]
    fn test_column_capabilities() {
        assert!(!ColumnId::Name.is_hideable());
        assert!(ColumnId::Name.is_sortable());
        assert!(!ColumnId::Select.is_sortable());
        assert!(ColumnId::Demand.is_hideable());
        assert_eq!(ColumnId::parse("Warehouse"), Some(ColumnId::Warehouse));
    }

    #[test]
    fn test_trend_window_tokens() {
        for w in TrendWindow::ALL {
            assert_eq!(TrendWindow::parse_token(w.range_token()), Some(w));
            assert_eq!(TrendWindow::from_days(w.days()), Some(w));
        }
        assert_eq!(TrendWindow::default(), TrendWindow::Days90);
    }
}
