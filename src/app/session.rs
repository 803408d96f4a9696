// ==========================================
// 库存监控驾驶舱 - 驾驶舱会话
// ==========================================
// 职责: 持有表格引擎、变更桥接、拖拽控制器与结算通道，串行应用远端结算
// 并发: 远端调用以 tokio 任务运行，结果经无界 mpsc 通道回到会话
// 红线: 会话销毁后到达的结算只记录 debug 日志并丢弃
// 红线: 过期的重拉结果（序号不大于已应用序号）直接丢弃
// ==========================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::mutation_bridge::{MutationBridge, Notification, RemoteCommand, Settlement};
use crate::api::DashboardApi;
use crate::domain::product::ProductRow;
use crate::domain::trend::{ChartPoint, TrendPoint};
use crate::domain::types::TrendWindow;
use crate::engine::error::EngineError;
use crate::engine::grid::{GridPage, GridStateEngine};
use crate::engine::reorder::{DragEvent, GestureSource, ReorderController, ReorderOutcome, RowLayout};
use crate::engine::trend_bucketizer::ChartWindowState;
use crate::remote::inventory_service::InventoryService;

// ==========================================
// DashboardSession
// ==========================================
pub struct DashboardSession {
    service: Arc<dyn InventoryService>,
    grid: GridStateEngine,
    bridge: MutationBridge,
    reorder: ReorderController,
    chart: ChartWindowState,
    trends: Vec<TrendPoint>,
    tx: UnboundedSender<Settlement>,
    rx: UnboundedReceiver<Settlement>,
    issued_refetch_seq: u64,
    applied_refetch_seq: u64,
    in_flight: usize,
}

impl DashboardSession {
    pub fn new(
        service: Arc<dyn InventoryService>,
        grid: GridStateEngine,
        bridge: MutationBridge,
        chart: ChartWindowState,
        trends: Vec<TrendPoint>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            grid,
            bridge,
            reorder: ReorderController::new(),
            chart,
            trends,
            tx,
            rx,
            issued_refetch_seq: 0,
            applied_refetch_seq: 0,
            in_flight: 0,
        }
    }

    /// 由驾驶舱 API 的就绪数据启动会话
    pub fn start(api: &DashboardApi, products: Vec<ProductRow>, trends: Vec<TrendPoint>) -> Self {
        let grid = api.seed_grid(products);
        let bridge = MutationBridge::new(api.settings().warehouse_codes.clone());
        Self::new(api.service(), grid, bridge, api.chart_state(), trends)
    }

    // ===== 访问器 =====

    pub fn grid(&self) -> &GridStateEngine {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridStateEngine {
        &mut self.grid
    }

    pub fn bridge(&self) -> &MutationBridge {
        &self.bridge
    }

    pub fn reorder(&self) -> &ReorderController {
        &self.reorder
    }

    pub fn chart(&self) -> &ChartWindowState {
        &self.chart
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn applied_refetch_seq(&self) -> u64 {
        self.applied_refetch_seq
    }

    pub fn visible_page(&self) -> GridPage {
        self.grid.visible_page()
    }

    fn row(&self, id: &str) -> ApiResult<ProductRow> {
        self.grid
            .row(id)
            .cloned()
            .ok_or_else(|| ApiError::Engine(EngineError::UnknownRow(id.to_string())))
    }

    // ===== 图表 =====

    pub fn select_window(&mut self, window: TrendWindow) {
        self.chart.select(window);
    }

    pub fn observe_layout_width(&mut self, width_px: u32) -> bool {
        self.chart.observe_layout_width(width_px)
    }

    pub fn chart_points(&self, now: DateTime<Utc>) -> Vec<ChartPoint> {
        self.chart.chart_points(&self.trends, now)
    }

    // ===== 拖拽重排 =====

    /// 当前页的等高行布局
    pub fn page_layout(&self, top: f64, row_height: f64) -> RowLayout {
        let page = self.grid.visible_page();
        RowLayout::uniform(page.rows.into_iter().map(|r| r.row.id), top, row_height)
    }

    pub fn drive_gesture(&mut self, event: DragEvent) -> ApiResult<ReorderOutcome> {
        Ok(self.reorder.drive(event, &mut self.grid)?)
    }

    /// 原始输入 → 手势源 → 拖拽控制器
    pub fn handle_gesture<S: GestureSource>(
        &mut self,
        source: &mut S,
        input: S::Input,
        layout: &RowLayout,
    ) -> ApiResult<ReorderOutcome> {
        match source.translate(input, layout) {
            Some(event) => self.drive_gesture(event),
            None => Ok(ReorderOutcome::Ignored),
        }
    }

    // ===== 需求编辑 =====

    pub fn demand_text(&self, row_id: &str) -> Option<String> {
        self.grid.row(row_id).map(|row| self.bridge.demand_text(row))
    }

    pub fn edit_demand(&mut self, row_id: &str, text: &str) -> ApiResult<()> {
        let row = self.row(row_id)?;
        self.bridge.demand_input(&row, text);
        Ok(())
    }

    /// 输入框失焦；返回发出的编辑 id（未变化时为 None）
    pub fn blur_demand(&mut self, row_id: &str) -> ApiResult<Option<u64>> {
        let row = self.row(row_id)?;
        match self.bridge.demand_blur(&row)? {
            Some(cmd) => Ok(Some(self.issue(cmd))),
            None => Ok(None),
        }
    }

    // ===== 调拨 =====

    pub fn available_destinations(&self, row_id: &str) -> ApiResult<Vec<String>> {
        let row = self.row(row_id)?;
        Ok(self.bridge.available_destinations(&row))
    }

    pub fn open_transfer(&mut self, row_id: &str) -> ApiResult<()> {
        self.row(row_id)?;
        self.bridge.open_transfer(row_id);
        Ok(())
    }

    pub fn close_transfer(&mut self, row_id: &str) {
        self.bridge.close_transfer(row_id);
    }

    pub fn set_transfer_destination(&mut self, row_id: &str, destination: Option<&str>) {
        self.bridge.set_transfer_destination(row_id, destination);
    }

    pub fn set_transfer_amount(&mut self, row_id: &str, amount_text: &str) {
        self.bridge.set_transfer_amount(row_id, amount_text);
    }

    /// 提交调拨；返回发出的编辑 id
    pub fn submit_transfer(&mut self, row_id: &str) -> ApiResult<u64> {
        let row = self.row(row_id)?;
        let cmd = self.bridge.submit_transfer(&row)?;
        Ok(self.issue(cmd))
    }

    // ===== 远端调用 =====

    fn issue(&mut self, cmd: RemoteCommand) -> u64 {
        let edit_id = cmd.edit_id();
        let service = self.service.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let settlement = match cmd {
                RemoteCommand::UpdateDemand {
                    edit_id,
                    row_name,
                    request,
                } => {
                    let result = service.update_demand(request.clone()).await;
                    Settlement::Demand {
                        edit_id,
                        row_name,
                        request,
                        result,
                    }
                }
                RemoteCommand::TransferStock { edit_id, request } => {
                    let result = service.transfer_stock(request.clone()).await;
                    Settlement::Transfer {
                        edit_id,
                        request,
                        result,
                    }
                }
            };
            deliver(&tx, settlement);
        });

        edit_id
    }

    /// 发出整表重拉；返回序号
    pub fn request_refetch(&mut self) -> u64 {
        self.issued_refetch_seq += 1;
        let seq = self.issued_refetch_seq;
        let service = self.service.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        info!(seq, "发出产品重拉");

        tokio::spawn(async move {
            let result = service.fetch_products().await;
            deliver(&tx, Settlement::Refetch { seq, result });
        });

        seq
    }

    // ===== 结算 =====

    /// 应用一条结算消息
    pub fn apply(&mut self, settlement: Settlement) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match settlement {
            Settlement::Refetch { seq, result } => {
                if seq <= self.applied_refetch_seq {
                    debug!(
                        seq,
                        applied = self.applied_refetch_seq,
                        "过期的重拉结果，已丢弃"
                    );
                    return;
                }
                match result {
                    Ok(rows) => {
                        self.applied_refetch_seq = seq;
                        info!(seq, count = rows.len(), "产品重拉完成");
                        self.bridge.sync_rows(&rows);
                        self.grid.set_rows(rows);
                    }
                    Err(err) => {
                        warn!(seq, error = %err, "产品重拉失败，保留当前工作副本");
                    }
                }
            }
            other => {
                if self.bridge.apply_settlement(&other) {
                    self.request_refetch();
                }
            }
        }
    }

    /// 非阻塞地应用所有已到达的结算；返回应用条数
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(settlement) = self.rx.try_recv() {
            self.apply(settlement);
            applied += 1;
        }
        applied
    }

    /// 等待并应用下一条结算
    pub async fn next_settlement(&mut self) -> bool {
        match self.rx.recv().await {
            Some(settlement) => {
                self.apply(settlement);
                true
            }
            None => false,
        }
    }

    /// 等待所有在途调用（含其触发的重拉）结算完毕
    pub async fn settle_all(&mut self) {
        while self.in_flight > 0 {
            if !self.next_settlement().await {
                break;
            }
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.bridge.drain_notifications()
    }
}

fn deliver(tx: &UnboundedSender<Settlement>, settlement: Settlement) {
    if tx.send(settlement).is_err() {
        debug!("会话已关闭，结算消息已丢弃");
    }
}
