// ==========================================
// 库存监控驾驶舱 - 驾驶舱配置读取 Trait
// ==========================================
// 职责: 定义表格/图表/调拨所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{ManualOrderPolicy, TrendWindow};
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 测试: tests/helpers/mock_config.rs
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    // ===== 表格 =====

    /// 默认每页条数
    ///
    /// # 默认值
    /// - 10
    async fn get_default_page_size(&self) -> Result<usize, Box<dyn Error>>;

    /// 每页条数下拉选项
    ///
    /// # 默认值
    /// - [10, 20, 30, 40, 50]
    async fn get_page_size_options(&self) -> Result<Vec<usize>, Box<dyn Error>>;

    /// 刷新后的手工顺序策略
    ///
    /// # 默认值
    /// - PRESERVE
    async fn get_manual_order_policy(&self) -> Result<ManualOrderPolicy, Box<dyn Error>>;

    // ===== 图表 =====

    /// 默认趋势窗口
    ///
    /// # 默认值
    /// - 90 天
    async fn get_default_trend_window(&self) -> Result<TrendWindow, Box<dyn Error>>;

    /// 窄屏断点（像素）
    ///
    /// # 默认值
    /// - 768
    async fn get_narrow_breakpoint_px(&self) -> Result<u32, Box<dyn Error>>;

    // ===== 远端请求 =====

    /// 趋势/KPI 请求的区间令牌
    ///
    /// # 默认值
    /// - "30d"
    async fn get_range_token(&self) -> Result<String, Box<dyn Error>>;

    /// 调拨可选仓库代码
    ///
    /// # 默认值
    /// - BLR-A, BLR-B, PNQ-C, DEL-B
    async fn get_warehouse_codes(&self) -> Result<Vec<String>, Box<dyn Error>>;

    // ===== 界面 =====

    /// 界面语言
    ///
    /// # 默认值
    /// - "en"
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;
}
