// ==========================================
// 库存监控驾驶舱 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源（数据库连接、数据服务、配置、API）
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::DashboardApi;
use crate::config::{ConfigManager, DashboardSettings};
use crate::db::open_and_prepare;
use crate::remote::{InventoryService, LocalInventoryService};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 数据服务（本地 SQLite 实现）
    pub service: Arc<dyn InventoryService>,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开共享连接并补齐表结构
    /// 2. 读取配置快照，设置界面语言
    /// 3. 创建数据服务与驾驶舱API
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_and_prepare(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );
        let settings = DashboardSettings::load(config_manager.as_ref())
            .await
            .map_err(|e| format!("配置加载失败: {}", e))?;
        crate::i18n::set_locale(&settings.locale);

        let service: Arc<dyn InventoryService> =
            Arc::new(LocalInventoryService::from_connection(conn));
        let dashboard_api = Arc::new(DashboardApi::new(service.clone(), settings));

        tracing::info!("AppState初始化完成");
        Ok(Self {
            db_path,
            config_manager,
            service,
            dashboard_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 INVENTORY_DASHBOARD_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("INVENTORY_DASHBOARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./inventory_dashboard.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("inventory-dashboard-dev");
        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("inventory-dashboard");

        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("inventory_dashboard.db");
        }
    }

    path.to_string_lossy().to_string()
}
