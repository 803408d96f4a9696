// ==========================================
// 库存监控驾驶舱 - 应用层
// ==========================================
// 职责: 组装共享资源，驱动驾驶舱会话
// ==========================================

pub mod session;
pub mod state;

// 重导出
pub use session::DashboardSession;
pub use state::{get_default_db_path, AppState};
