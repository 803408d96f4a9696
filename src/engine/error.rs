// ==========================================
// 库存监控驾驶舱 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use crate::domain::types::ColumnId;

/// 表格引擎错误（调用方误用，不影响视图）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("行不存在: id={0}")]
    UnknownRow(String),

    #[error("列不可排序: {0}")]
    ColumnNotSortable(ColumnId),

    #[error("列不可隐藏: {0}")]
    ColumnNotHideable(ColumnId),

    #[error("无效的每页条数: {0}")]
    InvalidPageSize(usize),

    #[error("未知列: {0}")]
    UnknownColumn(String),

    #[error("列筛选不适用: column={column}, reason={reason}")]
    InvalidColumnFilter { column: ColumnId, reason: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
