// ==========================================
// 库存监控驾驶舱 - 变更桥接类型
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductRow;
use crate::remote::error::ServiceError;
use crate::remote::inventory_service::{TransferAck, TransferStockRequest, UpdateDemandRequest};

/// 编辑生命周期: Pending → Committed | Failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum EditState {
    Pending,
    Committed,
    Failed(String),
}

impl EditState {
    pub fn is_pending(&self) -> bool {
        matches!(self, EditState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Demand,
    Transfer,
}

/// 单次编辑记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub edit_id: u64,
    pub row_id: String,
    pub kind: EditKind,
    pub state: EditState,
}

/// 行内需求输入框
///
/// `text` 为用户正在输入/已输入的文本；`committed` 为最近一次确认写入的值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandCell {
    pub text: String,
    pub committed: i64,
    pub pending_edit: Option<u64>,
}

impl DemandCell {
    pub fn new(committed: i64) -> Self {
        Self {
            text: committed.to_string(),
            committed,
            pending_edit: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.text.trim() != self.committed.to_string()
    }
}

/// 行操作菜单中的调拨表单
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub open: bool,
    pub destination: Option<String>,
    pub amount_text: String,
    /// 行内错误提示（本地校验失败时）
    pub error: Option<String>,
    pub pending_edit: Option<u64>,
}

impl TransferForm {
    pub fn clear(&mut self) {
        self.destination = None;
        self.amount_text.clear();
        self.error = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// 瞬时通知（toast）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// 校验通过、待发出的远端调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    UpdateDemand {
        edit_id: u64,
        row_name: String,
        request: UpdateDemandRequest,
    },
    TransferStock {
        edit_id: u64,
        request: TransferStockRequest,
    },
}

impl RemoteCommand {
    pub fn edit_id(&self) -> u64 {
        match self {
            RemoteCommand::UpdateDemand { edit_id, .. } => *edit_id,
            RemoteCommand::TransferStock { edit_id, .. } => *edit_id,
        }
    }
}

/// 远端调用结算消息（任务 → 会话）
#[derive(Debug, Clone)]
pub enum Settlement {
    Demand {
        edit_id: u64,
        row_name: String,
        request: UpdateDemandRequest,
        result: Result<ProductRow, ServiceError>,
    },
    Transfer {
        edit_id: u64,
        request: TransferStockRequest,
        result: Result<TransferAck, ServiceError>,
    },
    Refetch {
        seq: u64,
        result: Result<Vec<ProductRow>, ServiceError>,
    },
}
