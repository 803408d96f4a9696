// ==========================================
// 库存监控驾驶舱 - 引擎层
// ==========================================
// 职责: 纯派生计算与表格交互状态机（状态分类/趋势窗口/KPI/表格/拖拽重排）
// 红线: Engine 不拼 SQL，不发远端调用
// ==========================================

pub mod classifier;
pub mod error;
pub mod grid;
pub mod kpi_aggregator;
pub mod reorder;
pub mod trend_bucketizer;

// 重导出核心引擎
pub use classifier::{classify, classify_row};
pub use error::{EngineError, EngineResult};
pub use grid::{GridAction, GridPage, GridStateEngine, PageSelectionState, ViewState};
pub use kpi_aggregator::{aggregate, aggregate_first, kpi_cards, KpiCard, KpiView};
pub use reorder::{DragEvent, GestureSource, ReorderController, ReorderOutcome};
pub use trend_bucketizer::{bucketize, bucketize_at, to_chart_points, ChartWindowState};
