// ==========================================
// 库存监控驾驶舱 - 数据服务错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 只携带可读文本，结算消息需要跨任务传递（Clone + Send）
// ==========================================

use thiserror::Error;

use crate::repository::error::RepositoryError;

/// 远端调用失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("远端调用失败: {0}")]
    Transport(String),

    #[error("资源未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("请求被拒绝: {0}")]
    Rejected(String),

    #[error("数据访问失败: {0}")]
    Repository(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            RepositoryError::CheckConstraintViolation(msg) => ServiceError::Rejected(msg),
            RepositoryError::FieldValueError { field, message } => {
                ServiceError::Rejected(format!("{}: {}", field, message))
            }
            other => ServiceError::Repository(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ServiceResult<T> = Result<T, ServiceError>;
