// ==========================================
// 库存监控驾驶舱 - 核心库
// ==========================================
// 技术栈: Rust + tokio + SQLite（参考数据服务）
// 系统定位: 库存监控驾驶舱的交互核心（表格引擎 / KPI / 趋势 / 变更桥接）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 纯派生计算与表格状态
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 远端数据服务 - 契约与本地实现
pub mod remote;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 性能统计
pub mod perf;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 驾驶舱接口与变更桥接
pub mod api;

// 应用层 - 会话与共享状态
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ColumnId, ManualOrderPolicy, ProductStatus, SortDirection, StatusFilter, TrendDirection,
    TrendWindow,
};

// 领域实体
pub use domain::{ChartPoint, KpiSnapshot, ProductRow, TrendPoint};

// 引擎
pub use engine::{GridAction, GridStateEngine, ReorderController};

// 远端服务
pub use remote::{InventoryService, LocalInventoryService, ServiceError};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DashboardScreen, MutationBridge};

// 应用
pub use app::{AppState, DashboardSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存监控驾驶舱";
