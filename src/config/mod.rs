// ==========================================
// 库存监控驾驶舱 - 配置层
// ==========================================
// 职责: 表格/图表/调拨配置的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config_trait;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, defaults, ConfigManager};
pub use dashboard_config_trait::DashboardConfigReader;
pub use settings::DashboardSettings;
