// ==========================================
// 库存监控驾驶舱 - 远端数据服务层
// ==========================================
// 职责: 数据服务契约、错误类型与本地 SQLite 参考实现
// ==========================================

pub mod demo_seed;
pub mod error;
pub mod inventory_service;
pub mod local_service;

pub use demo_seed::{seed_demo_data, DemoSeedSummary};
pub use error::{ServiceError, ServiceResult};
pub use inventory_service::{
    InventoryService, TransferAck, TransferStockRequest, UpdateDemandRequest,
};
pub use local_service::LocalInventoryService;
