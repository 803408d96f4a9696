// ==========================================
// 库存监控驾驶舱 - 变更桥接
// ==========================================
// 职责: 把行内需求编辑 / 库存调拨翻译为远端调用，维护编辑生命周期
// 输入: 用户输入文本 + 远端结算消息（Settlement）
// 输出: 待发出的远端命令 / 通知队列 / 是否需要整表重拉
// 红线: 本地校验失败不发出远端调用；失败不回滚用户输入
// ==========================================

mod core;
mod types;

#[cfg(test)]
mod tests;

pub use core::{MutationBridge, SETTLED_EDIT_HISTORY};
pub use types::{
    DemandCell, EditKind, EditRecord, EditState, Notification, NotificationLevel, RemoteCommand,
    Settlement, TransferForm,
};
