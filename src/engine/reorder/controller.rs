// ==========================================
// 库存监控驾驶舱 - 重排控制器
// ==========================================
// 职责: 把一次完整的拖拽手势转换为至多一次 reorder(from, to)
// 红线: 每个完成的手势只提交一次；目标与源相同不提交
// 红线: 取消与游离事件不产生重排
// ==========================================

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::error::EngineResult;
use crate::engine::grid::GridStateEngine;

use super::gesture::{DragEvent, GestureOrigin};

/// 事件处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReorderOutcome {
    /// 无进行中手势时的游离事件，或进行中再次开始
    Ignored,
    Started,
    Moved,
    Committed { from_id: String, to_id: String },
    /// 手势结束但落点为空或与源相同
    Unchanged,
    Cancelled,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    id: String,
    origin: GestureOrigin,
    over_id: Option<String>,
}

/// 重排控制器（与具体输入设备解耦）
#[derive(Debug, Default)]
pub struct ReorderController {
    active: Option<ActiveDrag>,
}

impl ReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// 当前拖拽中的行
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    /// 当前悬停目标
    pub fn over_id(&self) -> Option<&str> {
        self.active.as_ref().and_then(|a| a.over_id.as_deref())
    }

    /// 处理逻辑事件（不触碰表格）
    pub fn handle(&mut self, event: DragEvent) -> ReorderOutcome {
        match event {
            DragEvent::Start { id, origin } => {
                if self.active.is_some() {
                    return ReorderOutcome::Ignored;
                }
                debug!(id = %id, ?origin, "拖拽开始");
                self.active = Some(ActiveDrag {
                    id,
                    origin,
                    over_id: None,
                });
                ReorderOutcome::Started
            }
            DragEvent::Move { over_id } => match self.active.as_mut() {
                Some(active) => {
                    active.over_id = over_id;
                    ReorderOutcome::Moved
                }
                None => ReorderOutcome::Ignored,
            },
            DragEvent::End { over_id } => {
                let Some(active) = self.active.take() else {
                    return ReorderOutcome::Ignored;
                };
                match over_id {
                    Some(to_id) if to_id != active.id => {
                        info!(
                            from_id = %active.id,
                            to_id = %to_id,
                            origin = ?active.origin,
                            "拖拽完成，提交重排"
                        );
                        ReorderOutcome::Committed {
                            from_id: active.id,
                            to_id,
                        }
                    }
                    _ => ReorderOutcome::Unchanged,
                }
            }
            DragEvent::Cancel => {
                if self.active.take().is_some() {
                    debug!("拖拽取消");
                    ReorderOutcome::Cancelled
                } else {
                    ReorderOutcome::Ignored
                }
            }
        }
    }

    /// 处理事件并在提交时写入表格手工顺序
    pub fn drive(
        &mut self,
        event: DragEvent,
        grid: &mut GridStateEngine,
    ) -> EngineResult<ReorderOutcome> {
        let outcome = self.handle(event);
        if let ReorderOutcome::Committed { from_id, to_id } = &outcome {
            grid.reorder(from_id, to_id)?;
        }
        Ok(outcome)
    }
}
