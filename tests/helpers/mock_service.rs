// ==========================================
// Mock 数据服务 - 计数 / 可注入失败 / 可延迟
// ==========================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use inventory_dashboard::domain::{KpiSnapshot, ProductRow, TrendPoint};
use inventory_dashboard::remote::{
    InventoryService, ServiceError, ServiceResult, TransferAck, TransferStockRequest,
    UpdateDemandRequest,
};

#[derive(Default)]
pub struct CallCounts {
    pub fetch_products: AtomicUsize,
    pub fetch_trends: AtomicUsize,
    pub fetch_kpis: AtomicUsize,
    pub update_demand: AtomicUsize,
    pub transfer_stock: AtomicUsize,
}

#[derive(Default)]
pub struct FailureFlags {
    pub fetch_products: AtomicBool,
    pub fetch_trends: AtomicBool,
    pub fetch_kpis: AtomicBool,
    pub update_demand: AtomicBool,
    pub transfer_stock: AtomicBool,
}

/// 内存数据服务
///
/// 变更会真实修改内存行，后续 fetch_products 可以看到结果。
pub struct MockInventoryService {
    rows: Mutex<Vec<ProductRow>>,
    trends: Vec<TrendPoint>,
    kpis: Vec<KpiSnapshot>,
    warehouses: Vec<String>,
    pub calls: CallCounts,
    pub fail: FailureFlags,
    mutation_delay: Mutex<Option<Duration>>,
}

impl MockInventoryService {
    pub fn new(rows: Vec<ProductRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            trends: Vec::new(),
            kpis: vec![KpiSnapshot::new(1000.0, 800.0, 90.0)],
            warehouses: ["BLR-A", "BLR-B", "PNQ-C", "DEL-B"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            calls: CallCounts::default(),
            fail: FailureFlags::default(),
            mutation_delay: Mutex::new(None),
        }
    }

    pub fn with_trends(mut self, trends: Vec<TrendPoint>) -> Self {
        self.trends = trends;
        self
    }

    pub fn with_kpis(mut self, kpis: Vec<KpiSnapshot>) -> Self {
        self.kpis = kpis;
        self
    }

    pub fn set_mutation_delay(&self, delay: Duration) {
        *self.mutation_delay.lock().unwrap() = Some(delay);
    }

    pub fn rows(&self) -> Vec<ProductRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn fail_on(flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }

    fn failing(flag: &AtomicBool, op: &str) -> ServiceResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(ServiceError::Transport(format!("{} unavailable", op)))
        } else {
            Ok(())
        }
    }

    async fn maybe_delay(&self) {
        let delay = *self.mutation_delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
    }
}

#[async_trait]
impl InventoryService for MockInventoryService {
    async fn fetch_products(&self) -> ServiceResult<Vec<ProductRow>> {
        self.calls.fetch_products.fetch_add(1, Ordering::SeqCst);
        Self::failing(&self.fail.fetch_products, "products")?;
        Ok(self.rows())
    }

    async fn fetch_trends(&self, _range: &str) -> ServiceResult<Vec<TrendPoint>> {
        self.calls.fetch_trends.fetch_add(1, Ordering::SeqCst);
        Self::failing(&self.fail.fetch_trends, "trends")?;
        Ok(self.trends.clone())
    }

    async fn fetch_kpis(&self, _range: &str) -> ServiceResult<Vec<KpiSnapshot>> {
        self.calls.fetch_kpis.fetch_add(1, Ordering::SeqCst);
        Self::failing(&self.fail.fetch_kpis, "kpis")?;
        Ok(self.kpis.clone())
    }

    async fn fetch_warehouses(&self) -> ServiceResult<Vec<String>> {
        Ok(self.warehouses.clone())
    }

    async fn update_demand(&self, request: UpdateDemandRequest) -> ServiceResult<ProductRow> {
        self.calls.update_demand.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        Self::failing(&self.fail.update_demand, "update_demand")?;

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| ServiceError::NotFound {
                entity: "product".to_string(),
                id: request.id.clone(),
            })?;
        row.demand = request.demand;
        Ok(row.clone())
    }

    async fn transfer_stock(&self, request: TransferStockRequest) -> ServiceResult<TransferAck> {
        self.calls.transfer_stock.fetch_add(1, Ordering::SeqCst);
        self.maybe_delay().await;
        Self::failing(&self.fail.transfer_stock, "transfer_stock")?;

        let mut rows = self.rows.lock().unwrap();
        let source = rows
            .iter_mut()
            .find(|r| r.id == request.id)
            .ok_or_else(|| ServiceError::NotFound {
                entity: "product".to_string(),
                id: request.id.clone(),
            })?;
        if request.amount > source.stock {
            return Err(ServiceError::Rejected("insufficient stock".to_string()));
        }
        source.stock -= request.amount;
        let mut moved = source.clone();
        moved.id = format!("{}-{}", request.id, request.to_warehouse);
        moved.warehouse = request.to_warehouse.clone();
        moved.stock = request.amount;
        moved.demand = 0;
        rows.push(moved);
        Ok(TransferAck::from(&request))
    }
}
