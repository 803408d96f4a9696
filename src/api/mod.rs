// ==========================================
// 库存监控驾驶舱 - API 层
// ==========================================
// 职责: 面向界面外壳的聚合接口与变更桥接
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod mutation_bridge;

// 重导出核心类型
pub use dashboard_api::{
    resolve_screen, DashboardApi, DashboardScreen, DashboardView, LoadState, LoadingStage,
    ReadyData, ScreenSource,
};
pub use error::{ApiError, ApiResult, EditValidationError};
pub use mutation_bridge::{
    EditKind, EditRecord, EditState, MutationBridge, Notification, NotificationLevel,
    RemoteCommand, Settlement, TransferForm,
};
