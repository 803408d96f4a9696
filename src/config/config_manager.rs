// ==========================================
// 库存监控驾驶舱 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 红线: 非法配置值记录告警并回退默认值，不向上报错
// ==========================================

use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::types::{ManualOrderPolicy, TrendWindow};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名 global 配置；快照中不存在的键保持不变
    pub fn restore_config_from_snapshot(
        &self,
        snapshot_json: &str,
    ) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 解析辅助
// ==========================================

fn parse_positive_usize(key: &str, raw: &str, default: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => v,
        _ => {
            warn!(key, value = raw, default, "配置值非法，使用默认值");
            default
        }
    }
}

fn parse_csv_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ==========================================
// DashboardConfigReader 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_default_page_size(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_PAGE_SIZE, "10")?;
        Ok(parse_positive_usize(
            config_keys::DEFAULT_PAGE_SIZE,
            &value,
            defaults::PAGE_SIZE,
        ))
    }

    async fn get_page_size_options(&self) -> Result<Vec<usize>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::PAGE_SIZE_OPTIONS, "10,20,30,40,50")?;

        let mut options: Vec<usize> = parse_csv_list(&value)
            .iter()
            .filter_map(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .collect();
        options.sort_unstable();
        options.dedup();

        if options.is_empty() {
            warn!(value = %value, "每页条数选项非法，使用默认值");
            Ok(defaults::PAGE_SIZE_OPTIONS.to_vec())
        } else {
            Ok(options)
        }
    }

    async fn get_manual_order_policy(&self) -> Result<ManualOrderPolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::MANUAL_ORDER_ON_REFETCH, "PRESERVE")?;
        Ok(ManualOrderPolicy::parse(&value).unwrap_or_else(|| {
            warn!(value = %value, "手工顺序策略非法，使用 PRESERVE");
            ManualOrderPolicy::Preserve
        }))
    }

    async fn get_default_trend_window(&self) -> Result<TrendWindow, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_WINDOW_DAYS, "90")?;
        let window = value
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(TrendWindow::from_days);
        Ok(window.unwrap_or_else(|| {
            warn!(value = %value, "趋势窗口非法（仅支持 7/30/90），使用 90");
            TrendWindow::Days90
        }))
    }

    async fn get_narrow_breakpoint_px(&self) -> Result<u32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::NARROW_BREAKPOINT_PX, "768")?;
        Ok(value.trim().parse::<u32>().unwrap_or_else(|_| {
            warn!(value = %value, "窄屏断点非法，使用 768");
            defaults::NARROW_BREAKPOINT_PX
        }))
    }

    async fn get_range_token(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::RANGE_TOKEN, "30d")?;
        if TrendWindow::parse_token(&value).is_some() {
            Ok(value.trim().to_string())
        } else {
            warn!(value = %value, "区间令牌非法，使用 30d");
            Ok(defaults::RANGE_TOKEN.to_string())
        }
    }

    async fn get_warehouse_codes(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::WAREHOUSE_CODES, "BLR-A,BLR-B,PNQ-C,DEL-B")?;
        let codes = parse_csv_list(&value);
        if codes.is_empty() {
            warn!("仓库列表为空，使用默认值");
            Ok(defaults::warehouse_codes())
        } else {
            Ok(codes)
        }
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, "en")?;
        Ok(value.trim().to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 表格
    pub const DEFAULT_PAGE_SIZE: &str = "grid.default_page_size";
    pub const PAGE_SIZE_OPTIONS: &str = "grid.page_size_options";
    pub const MANUAL_ORDER_ON_REFETCH: &str = "grid.manual_order_on_refetch";

    // 图表
    pub const DEFAULT_WINDOW_DAYS: &str = "chart.default_window_days";
    pub const NARROW_BREAKPOINT_PX: &str = "chart.narrow_breakpoint_px";

    // 远端请求
    pub const RANGE_TOKEN: &str = "dashboard.range_token";
    pub const WAREHOUSE_CODES: &str = "warehouse.codes";

    // 界面
    pub const LOCALE: &str = "ui.locale";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const PAGE_SIZE: usize = 10;
    pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];
    pub const NARROW_BREAKPOINT_PX: u32 = 768;
    pub const RANGE_TOKEN: &str = "30d";
    pub const WAREHOUSE_CODES: [&str; 4] = ["BLR-A", "BLR-B", "PNQ-C", "DEL-B"];

    pub fn warehouse_codes() -> Vec<String> {
        WAREHOUSE_CODES.iter().map(|s| s.to_string()).collect()
    }
}
