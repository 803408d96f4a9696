// ==========================================
// 库存监控驾驶舱 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod product;
pub mod trend;
pub mod types;

// 重导出核心类型
pub use product::ProductRow;
pub use trend::{ChartPoint, KpiSnapshot, TrendPoint};
pub use types::{
    ColumnId, ManualOrderPolicy, ProductStatus, SortDirection, StatusFilter, TrendDirection,
    TrendWindow,
};
