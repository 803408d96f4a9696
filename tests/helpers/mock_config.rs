// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use inventory_dashboard::config::DashboardConfigReader;
use inventory_dashboard::domain::types::{ManualOrderPolicy, TrendWindow};
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub manual_order_policy: ManualOrderPolicy,
    pub default_trend_window: TrendWindow,
    pub narrow_breakpoint_px: u32,
    pub range_token: String,
    pub warehouse_codes: Vec<String>,
    pub locale: String,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 20, 30, 40, 50],
            manual_order_policy: ManualOrderPolicy::Preserve,
            default_trend_window: TrendWindow::Days90,
            narrow_breakpoint_px: 768,
            range_token: "30d".to_string(),
            warehouse_codes: ["BLR-A", "BLR-B", "PNQ-C", "DEL-B"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            locale: "en".to_string(),
        }
    }

    /// 刷新后重置手工顺序
    pub fn reset_on_refetch() -> Self {
        let mut config = Self::default();
        config.manual_order_policy = ManualOrderPolicy::Reset;
        config
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let mut config = Self::default();
        config.default_page_size = page_size;
        config
    }
}

#[async_trait]
impl DashboardConfigReader for MockConfig {
    async fn get_default_page_size(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.default_page_size)
    }

    async fn get_page_size_options(&self) -> Result<Vec<usize>, Box<dyn Error>> {
        Ok(self.page_size_options.clone())
    }

    async fn get_manual_order_policy(&self) -> Result<ManualOrderPolicy, Box<dyn Error>> {
        Ok(self.manual_order_policy)
    }

    async fn get_default_trend_window(&self) -> Result<TrendWindow, Box<dyn Error>> {
        Ok(self.default_trend_window)
    }

    async fn get_narrow_breakpoint_px(&self) -> Result<u32, Box<dyn Error>> {
        Ok(self.narrow_breakpoint_px)
    }

    async fn get_range_token(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.range_token.clone())
    }

    async fn get_warehouse_codes(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.warehouse_codes.clone())
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.locale.clone())
    }
}
