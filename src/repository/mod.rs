// ==========================================
// 库存监控驾驶舱 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 本地数据服务的数据访问，屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod kpi_repo;
pub mod product_repo;
pub mod trend_repo;
pub mod warehouse_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use kpi_repo::KpiRepository;
pub use product_repo::ProductRepository;
pub use trend_repo::TrendRepository;
pub use warehouse_repo::WarehouseRepository;
