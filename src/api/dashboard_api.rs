// ==========================================
// 库存监控驾驶舱 - 驾驶舱 API
// ==========================================
// 职责: 并发拉取产品/趋势/KPI，按固定顺序解析整屏状态，组装就绪视图
// 红线: 加载与错误为整屏阻塞态，判定顺序固定
//   1. 产品或趋势在途 → 产品加载中
//   2. 产品错误 → 趋势错误
//   3. KPI 在途 → KPI 加载中；KPI 错误
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::settings::DashboardSettings;
use crate::domain::product::ProductRow;
use crate::domain::trend::{ChartPoint, KpiSnapshot, TrendPoint};
use crate::domain::types::TrendWindow;
use crate::engine::grid::{GridPage, GridStateEngine};
use crate::engine::kpi_aggregator::{aggregate_first, kpi_cards, KpiCard, KpiView};
use crate::engine::trend_bucketizer::ChartWindowState;
use crate::i18n::{t, t_with_args};
use crate::remote::error::ServiceResult;
use crate::remote::inventory_service::InventoryService;

// ==========================================
// 加载状态
// ==========================================

/// 单个远端查询的加载状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => LoadState::Ready(v),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingStage {
    Products,
    Kpis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSource {
    Products,
    Trends,
    Kpis,
}

/// 三个查询都就绪后的原始数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadyData {
    pub products: Vec<ProductRow>,
    pub trends: Vec<TrendPoint>,
    pub kpis: Vec<KpiSnapshot>,
}

/// 整屏状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum DashboardScreen<R = ReadyData> {
    Loading { stage: LoadingStage, message: String },
    Error { source: ScreenSource, message: String },
    Ready(R),
}

impl<R> DashboardScreen<R> {
    pub fn is_ready(&self) -> bool {
        matches!(self, DashboardScreen::Ready(_))
    }

    fn loading(stage: LoadingStage) -> Self {
        let key = match stage {
            LoadingStage::Products => "shell.products_loading",
            LoadingStage::Kpis => "shell.kpi_loading",
        };
        DashboardScreen::Loading {
            stage,
            message: t(key),
        }
    }

    fn error(source: ScreenSource, raw: &str) -> Self {
        DashboardScreen::Error {
            source,
            message: t_with_args("shell.error", &[("message", raw)]),
        }
    }

    /// 变换就绪载荷
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> DashboardScreen<U> {
        match self {
            DashboardScreen::Loading { stage, message } => DashboardScreen::Loading { stage, message },
            DashboardScreen::Error { source, message } => DashboardScreen::Error { source, message },
            DashboardScreen::Ready(r) => DashboardScreen::Ready(f(r)),
        }
    }
}

/// 解析整屏状态（纯函数）
pub fn resolve_screen(
    products: &LoadState<Vec<ProductRow>>,
    trends: &LoadState<Vec<TrendPoint>>,
    kpis: &LoadState<Vec<KpiSnapshot>>,
) -> DashboardScreen {
    if products.is_loading() || trends.is_loading() {
        return DashboardScreen::loading(LoadingStage::Products);
    }
    if let Some(msg) = products.failure() {
        return DashboardScreen::error(ScreenSource::Products, msg);
    }
    if let Some(msg) = trends.failure() {
        return DashboardScreen::error(ScreenSource::Trends, msg);
    }
    if kpis.is_loading() {
        return DashboardScreen::loading(LoadingStage::Kpis);
    }
    if let Some(msg) = kpis.failure() {
        return DashboardScreen::error(ScreenSource::Kpis, msg);
    }

    match (products.ready(), trends.ready(), kpis.ready()) {
        (Some(p), Some(tr), Some(k)) => DashboardScreen::Ready(ReadyData {
            products: p.clone(),
            trends: tr.clone(),
            kpis: k.clone(),
        }),
        // 上面的分支已覆盖 Loading / Failed
        _ => DashboardScreen::loading(LoadingStage::Products),
    }
}

// ==========================================
// 就绪视图
// ==========================================

/// 驾驶舱就绪视图（卡片 + 图表 + 首屏表格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub kpi: KpiSnapshot,
    pub kpi_view: KpiView,
    pub cards: Vec<KpiCard>,
    pub window: TrendWindow,
    pub chart: Vec<ChartPoint>,
    pub trends: Vec<TrendPoint>,
    pub products: Vec<ProductRow>,
    pub first_page: GridPage,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    service: Arc<dyn InventoryService>,
    settings: DashboardSettings,
}

impl DashboardApi {
    pub fn new(service: Arc<dyn InventoryService>, settings: DashboardSettings) -> Self {
        Self { service, settings }
    }

    pub fn service(&self) -> Arc<dyn InventoryService> {
        self.service.clone()
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// 并发拉取三类数据并解析整屏状态
    pub async fn fetch_screen(&self) -> DashboardScreen {
        let range = self.settings.range_token.as_str();
        info!(range, "驾驶舱数据拉取");

        let (products, trends, kpis): (
            ServiceResult<Vec<ProductRow>>,
            ServiceResult<Vec<TrendPoint>>,
            ServiceResult<Vec<KpiSnapshot>>,
        ) = tokio::join!(
            self.service.fetch_products(),
            self.service.fetch_trends(range),
            self.service.fetch_kpis(range),
        );

        for (source, err) in [
            ("products", products.as_ref().err()),
            ("trends", trends.as_ref().err()),
            ("kpis", kpis.as_ref().err()),
        ] {
            if let Some(err) = err {
                warn!(source, error = %err, "驾驶舱数据拉取失败");
            }
        }

        resolve_screen(&products.into(), &trends.into(), &kpis.into())
    }

    /// 按配置构造并播种表格引擎
    pub fn seed_grid(&self, rows: Vec<ProductRow>) -> GridStateEngine {
        let mut grid = GridStateEngine::with_options(
            self.settings.default_page_size,
            self.settings.page_size_options.clone(),
            self.settings.manual_order_policy,
        );
        grid.set_rows(rows);
        grid
    }

    pub fn chart_state(&self) -> ChartWindowState {
        ChartWindowState::new(
            self.settings.default_trend_window,
            self.settings.narrow_breakpoint_px,
        )
    }

    /// 由就绪数据组装视图
    pub fn build_view(
        &self,
        data: ReadyData,
        chart_state: &ChartWindowState,
        now: DateTime<Utc>,
    ) -> DashboardView {
        let (kpi, kpi_view) = aggregate_first(&data.kpis);
        let cards = kpi_cards(&kpi);
        let chart = chart_state.chart_points(&data.trends, now);
        let first_page = self.seed_grid(data.products.clone()).visible_page();

        DashboardView {
            kpi,
            kpi_view,
            cards,
            window: chart_state.window(),
            chart,
            trends: data.trends,
            products: data.products,
            first_page,
        }
    }

    /// 拉取并组装完整视图
    pub async fn load(&self, now: DateTime<Utc>) -> DashboardScreen<DashboardView> {
        let chart_state = self.chart_state();
        self.fetch_screen()
            .await
            .map(|data| self.build_view(data, &chart_state, now))
    }
}
