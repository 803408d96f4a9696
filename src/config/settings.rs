// ==========================================
// 库存监控驾驶舱 - 驾驶舱配置快照
// ==========================================
// 职责: 会话启动时一次性读取全部配置，之后只读
// ==========================================

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::config::config_manager::defaults;
use crate::config::dashboard_config_trait::DashboardConfigReader;
use crate::domain::types::{ManualOrderPolicy, TrendWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub manual_order_policy: ManualOrderPolicy,
    pub default_trend_window: TrendWindow,
    pub narrow_breakpoint_px: u32,
    pub range_token: String,
    pub warehouse_codes: Vec<String>,
    pub locale: String,
}

impl DashboardSettings {
    /// 从配置读取器加载
    pub async fn load(reader: &dyn DashboardConfigReader) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            default_page_size: reader.get_default_page_size().await?,
            page_size_options: reader.get_page_size_options().await?,
            manual_order_policy: reader.get_manual_order_policy().await?,
            default_trend_window: reader.get_default_trend_window().await?,
            narrow_breakpoint_px: reader.get_narrow_breakpoint_px().await?,
            range_token: reader.get_range_token().await?,
            warehouse_codes: reader.get_warehouse_codes().await?,
            locale: reader.get_locale().await?,
        })
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_page_size: defaults::PAGE_SIZE,
            page_size_options: defaults::PAGE_SIZE_OPTIONS.to_vec(),
            manual_order_policy: ManualOrderPolicy::Preserve,
            default_trend_window: TrendWindow::Days90,
            narrow_breakpoint_px: defaults::NARROW_BREAKPOINT_PX,
            range_token: defaults::RANGE_TOKEN.to_string(),
            warehouse_codes: defaults::warehouse_codes(),
            locale: "en".to_string(),
        }
    }
}
