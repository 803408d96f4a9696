// ==========================================
// 库存监控驾驶舱 - 远端数据服务接口
// ==========================================
// 职责: 定义驾驶舱依赖的查询/变更契约（不包含实现）
// 红线: 变更成功后客户端一律整表重拉，不依赖返回值修补本地状态
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductRow;
use crate::domain::trend::{KpiSnapshot, TrendPoint};
use crate::remote::error::ServiceResult;

/// 更新需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDemandRequest {
    pub id: String,
    pub demand: i64,
}

/// 库存调拨
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStockRequest {
    pub id: String,
    pub amount: i64,
    pub from_warehouse: String,
    pub to_warehouse: String,
}

/// 调拨回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferAck {
    pub id: String,
    pub amount: i64,
    pub from_warehouse: String,
    pub to_warehouse: String,
}

impl From<&TransferStockRequest> for TransferAck {
    fn from(req: &TransferStockRequest) -> Self {
        Self {
            id: req.id.clone(),
            amount: req.amount,
            from_warehouse: req.from_warehouse.clone(),
            to_warehouse: req.to_warehouse.clone(),
        }
    }
}

// ==========================================
// InventoryService Trait
// ==========================================
// 实现者: LocalInventoryService（SQLite）
// 测试: tests/helpers/mock_service.rs
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// 全部产品（整表替换）
    async fn fetch_products(&self) -> ServiceResult<Vec<ProductRow>>;

    /// 趋势序列
    ///
    /// # 参数
    /// - `range`: 区间令牌（"7d" / "30d" / "90d"）
    async fn fetch_trends(&self, range: &str) -> ServiceResult<Vec<TrendPoint>>;

    /// KPI 快照列表（调用方只消费第一个）
    async fn fetch_kpis(&self, range: &str) -> ServiceResult<Vec<KpiSnapshot>>;

    /// 仓库代码
    async fn fetch_warehouses(&self) -> ServiceResult<Vec<String>>;

    /// 更新需求；返回更新后的行（调用方忽略）
    async fn update_demand(&self, request: UpdateDemandRequest) -> ServiceResult<ProductRow>;

    /// 调拨库存
    async fn transfer_stock(&self, request: TransferStockRequest) -> ServiceResult<TransferAck>;
}
