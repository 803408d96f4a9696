// ==========================================
// 库存监控驾驶舱 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，汇总各层错误为用户可读的错误消息
// 红线: 只向界面暴露可读文本，任何错误都不终止视图
// ==========================================

use crate::engine::error::EngineError;
use crate::remote::error::ServiceError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

// ==========================================
// EditValidationError - 编辑前置校验
// ==========================================

/// 本地校验失败（远端调用不会发出）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditValidationError {
    #[error("未选择目标仓")]
    MissingDestination,

    #[error("目标仓与源仓相同: {warehouse}")]
    SameWarehouse { warehouse: String },

    #[error("未知目标仓: {warehouse}")]
    UnknownDestination { warehouse: String },

    #[error("调拨数量必须为正整数: {input}")]
    InvalidAmount { input: String },

    #[error("调拨数量超过当前库存 ({stock})")]
    AmountExceedsStock { stock: i64 },

    #[error("需求必须为非负整数: {input}")]
    InvalidDemand { input: String },
}

impl EditValidationError {
    /// 本地化提示文本
    pub fn user_message(&self) -> String {
        use crate::i18n::{t, t_with_args};
        match self {
            EditValidationError::MissingDestination => t("transfer.missing_destination"),
            EditValidationError::SameWarehouse { .. } => t("transfer.same_warehouse"),
            EditValidationError::UnknownDestination { warehouse } => {
                t_with_args("transfer.unknown_destination", &[("warehouse", warehouse)])
            }
            EditValidationError::InvalidAmount { .. } => t("transfer.invalid_amount"),
            EditValidationError::AmountExceedsStock { stock } => {
                t_with_args("transfer.exceeds_stock", &[("stock", &stock.to_string())])
            }
            EditValidationError::InvalidDemand { input } => {
                t_with_args("demand.invalid", &[("input", input)])
            }
        }
    }
}

// ==========================================
// ApiError
// ==========================================

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与业务错误
    // ==========================================
    #[error("输入参数错误: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("校验失败: {0}")]
    Validation(#[from] EditValidationError),

    #[error("表格操作被拒绝: {0}")]
    Engine(#[from] EngineError),

    #[error("远端调用失败: {0}")]
    Service(ServiceError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 系统错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            other => ApiError::Service(other),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束冲突: {}", msg))
            }
            RepositoryError::CheckConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("数据约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::LockError(msg) => ApiError::InternalError(format!("锁获取失败: {}", msg)),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
