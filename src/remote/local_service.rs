// ==========================================
// 库存监控驾驶舱 - 本地 SQLite 数据服务
// ==========================================
// 职责: 以 SQLite 仓储实现 InventoryService（参考实现 / 演示用）
// 红线: 库存不得为负；调拨在单事务内完成
// ==========================================

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::open_and_prepare;
use crate::domain::product::ProductRow;
use crate::domain::trend::{KpiSnapshot, TrendPoint};
use crate::domain::types::TrendWindow;
use crate::perf::PerfGuard;
use crate::remote::error::{ServiceError, ServiceResult};
use crate::remote::inventory_service::{
    InventoryService, TransferAck, TransferStockRequest, UpdateDemandRequest,
};
use crate::repository::{KpiRepository, ProductRepository, TrendRepository, WarehouseRepository};

// ==========================================
// LocalInventoryService
// ==========================================
pub struct LocalInventoryService {
    products: ProductRepository,
    trends: TrendRepository,
    kpis: KpiRepository,
    warehouses: WarehouseRepository,
}

impl LocalInventoryService {
    /// 打开数据库文件并补齐表结构
    pub fn open(db_path: &str) -> ServiceResult<Self> {
        let conn = open_and_prepare(db_path)
            .map_err(|e| ServiceError::Transport(format!("打开数据库失败: {}", e)))?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 共享已有连接（调用方负责 ensure_schema）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            products: ProductRepository::from_connection(conn.clone()),
            trends: TrendRepository::from_connection(conn.clone()),
            kpis: KpiRepository::from_connection(conn.clone()),
            warehouses: WarehouseRepository::from_connection(conn),
        }
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn trends(&self) -> &TrendRepository {
        &self.trends
    }

    pub fn kpis(&self) -> &KpiRepository {
        &self.kpis
    }

    pub fn warehouses(&self) -> &WarehouseRepository {
        &self.warehouses
    }

    fn parse_range(range: &str) -> ServiceResult<TrendWindow> {
        TrendWindow::parse_token(range)
            .ok_or_else(|| ServiceError::Rejected(format!("未知区间令牌: {}", range)))
    }

    /// 由当前产品汇总推导 KPI
    fn derive_kpi(&self) -> ServiceResult<KpiSnapshot> {
        let (stock, demand, covered) = self.products.totals()?;
        let fill_rate = if demand > 0 {
            covered as f64 / demand as f64 * 100.0
        } else {
            0.0
        };
        Ok(KpiSnapshot::new(stock as f64, demand as f64, fill_rate))
    }

    fn trends_since(&self, since: NaiveDate) -> ServiceResult<Vec<TrendPoint>> {
        Ok(self.trends.list_since(since)?)
    }
}

#[async_trait]
impl InventoryService for LocalInventoryService {
    async fn fetch_products(&self) -> ServiceResult<Vec<ProductRow>> {
        let _perf = PerfGuard::new("service_fetch_products");
        let rows = self.products.list_all()?;
        info!(count = rows.len(), "产品列表已加载");
        Ok(rows)
    }

    async fn fetch_trends(&self, range: &str) -> ServiceResult<Vec<TrendPoint>> {
        let _perf = PerfGuard::new("service_fetch_trends");
        let window = Self::parse_range(range)?;
        let since = Utc::now().date_naive() - Duration::days(window.days());
        let points = self.trends_since(since)?;
        info!(range, count = points.len(), "趋势序列已加载");
        Ok(points)
    }

    async fn fetch_kpis(&self, range: &str) -> ServiceResult<Vec<KpiSnapshot>> {
        let _perf = PerfGuard::new("service_fetch_kpis");
        Self::parse_range(range)?;
        let snapshot = match self.kpis.find_by_range(range)? {
            Some(stored) => stored,
            None => self.derive_kpi()?,
        };
        Ok(vec![snapshot])
    }

    async fn fetch_warehouses(&self) -> ServiceResult<Vec<String>> {
        let _perf = PerfGuard::new("service_fetch_warehouses");
        Ok(self.warehouses.list_codes()?)
    }

    async fn update_demand(&self, request: UpdateDemandRequest) -> ServiceResult<ProductRow> {
        let _perf = PerfGuard::new("service_update_demand");
        if request.demand < 0 {
            warn!(id = %request.id, demand = request.demand, "需求不能为负");
            return Err(ServiceError::Rejected(format!(
                "需求不能为负: {}",
                request.demand
            )));
        }
        let row = self.products.update_demand(&request.id, request.demand)?;
        info!(id = %row.id, demand = row.demand, "需求已更新");
        Ok(row)
    }

    async fn transfer_stock(&self, request: TransferStockRequest) -> ServiceResult<TransferAck> {
        let _perf = PerfGuard::new("service_transfer_stock");

        if request.amount <= 0 {
            return Err(ServiceError::Rejected(format!(
                "调拨数量必须为正: {}",
                request.amount
            )));
        }
        if request.from_warehouse == request.to_warehouse {
            return Err(ServiceError::Rejected("源仓与目标仓相同".to_string()));
        }

        let source = self
            .products
            .find_by_id(&request.id)?
            .ok_or_else(|| ServiceError::NotFound {
                entity: "product".to_string(),
                id: request.id.clone(),
            })?;

        if source.warehouse != request.from_warehouse {
            return Err(ServiceError::Rejected(format!(
                "源仓不匹配: 期望 {}, 实际 {}",
                request.from_warehouse, source.warehouse
            )));
        }
        if request.amount > source.stock {
            return Err(ServiceError::Rejected(format!(
                "库存不足: {} > {}",
                request.amount, source.stock
            )));
        }

        let known = self.warehouses.list_codes()?;
        if !known.is_empty() && !known.iter().any(|c| c == &request.to_warehouse) {
            return Err(ServiceError::Rejected(format!(
                "未知目标仓: {}",
                request.to_warehouse
            )));
        }

        let new_id = Uuid::new_v4().to_string();
        self.products
            .transfer_stock(&request.id, request.amount, &request.to_warehouse, &new_id)?;

        info!(
            id = %request.id,
            amount = request.amount,
            from = %request.from_warehouse,
            to = %request.to_warehouse,
            "调拨完成"
        );
        Ok(TransferAck::from(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn service() -> LocalInventoryService {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let svc = LocalInventoryService::from_connection(Arc::new(Mutex::new(conn)));
        svc.warehouses
            .replace_all(&["BLR-A".to_string(), "PNQ-C".to_string()])
            .unwrap();
        svc.products
            .upsert(&ProductRow::new("p1", "Widget", "W-1", "BLR-A", 10, 12))
            .unwrap();
        svc
    }

    #[tokio::test]
    async fn test_transfer_moves_stock_into_new_row() {
        let svc = service();
        let ack = svc
            .transfer_stock(TransferStockRequest {
                id: "p1".to_string(),
                amount: 4,
                from_warehouse: "BLR-A".to_string(),
                to_warehouse: "PNQ-C".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ack.amount, 4);

        let rows = svc.fetch_products().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stock, 6);
        assert_eq!(rows[1].warehouse, "PNQ-C");
        assert_eq!(rows[1].stock, 4);
        assert_eq!(rows[1].sku, "W-1");
    }

    #[tokio::test]
    async fn test_transfer_rejects_overdraw() {
        let svc = service();
        let err = svc
            .transfer_stock(TransferStockRequest {
                id: "p1".to_string(),
                amount: 11,
                from_warehouse: "BLR-A".to_string(),
                to_warehouse: "PNQ-C".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
        assert_eq!(svc.products.find_by_id("p1").unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn test_kpi_falls_back_to_product_totals() {
        let svc = service();
        let kpis = svc.fetch_kpis("30d").await.unwrap();
        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].total_stock, 10.0);
        assert_eq!(kpis[0].total_demand, 12.0);
        assert!((kpis[0].fill_rate - 10.0 / 12.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_range_is_rejected() {
        let svc = service();
        assert!(matches!(
            svc.fetch_trends("1y").await,
            Err(ServiceError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_update_demand_unknown_id() {
        let svc = service();
        let err = svc
            .update_demand(UpdateDemandRequest {
                id: "missing".to_string(),
                demand: 3,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
