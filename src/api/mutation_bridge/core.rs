// ==========================================
// 库存监控驾驶舱 - 变更桥接状态机
// ==========================================
// 红线: 成功后整表重拉，不在本地修补行数据
// 红线: 失败保留用户输入，不自动回退
// ==========================================

use std::collections::{BTreeMap, HashMap};

use tracing::{info, warn};

use crate::api::error::EditValidationError;
use crate::domain::product::ProductRow;
use crate::i18n::{t, t_with_args};
use crate::remote::inventory_service::{TransferStockRequest, UpdateDemandRequest};

use super::types::{
    DemandCell, EditKind, EditRecord, EditState, Notification, RemoteCommand, Settlement,
    TransferForm,
};

/// 保留的已结算编辑记录上限（在途记录不计入、不淘汰）
pub const SETTLED_EDIT_HISTORY: usize = 64;

// ==========================================
// MutationBridge
// ==========================================
pub struct MutationBridge {
    warehouse_codes: Vec<String>,
    demand_cells: HashMap<String, DemandCell>,
    transfer_forms: HashMap<String, TransferForm>,
    edits: BTreeMap<u64, EditRecord>,
    notifications: Vec<Notification>,
    next_edit_id: u64,
}

impl MutationBridge {
    /// # 参数
    /// - warehouse_codes: 调拨可选仓库（配置值）
    pub fn new(warehouse_codes: Vec<String>) -> Self {
        Self {
            warehouse_codes,
            demand_cells: HashMap::new(),
            transfer_forms: HashMap::new(),
            edits: BTreeMap::new(),
            notifications: Vec::new(),
            next_edit_id: 1,
        }
    }

    pub fn warehouse_codes(&self) -> &[String] {
        &self.warehouse_codes
    }

    fn begin_edit(&mut self, row_id: &str, kind: EditKind) -> u64 {
        let edit_id = self.next_edit_id;
        self.next_edit_id += 1;
        self.edits.insert(
            edit_id,
            EditRecord {
                edit_id,
                row_id: row_id.to_string(),
                kind,
                state: EditState::Pending,
            },
        );
        edit_id
    }

    fn settle_edit(&mut self, edit_id: u64, state: EditState) {
        match self.edits.get_mut(&edit_id) {
            Some(record) => record.state = state,
            None => {
                warn!(edit_id, "未知编辑 id 的结算消息，已忽略");
                return;
            }
        }
        self.prune_settled();
    }

    /// 淘汰最早的已结算记录，使其数量不超过上限
    fn prune_settled(&mut self) {
        let settled: Vec<u64> = self
            .edits
            .values()
            .filter(|e| !e.state.is_pending())
            .map(|e| e.edit_id)
            .collect();
        let excess = settled.len().saturating_sub(SETTLED_EDIT_HISTORY);
        for edit_id in settled.into_iter().take(excess) {
            self.edits.remove(&edit_id);
        }
    }

    pub fn edit(&self, edit_id: u64) -> Option<&EditRecord> {
        self.edits.get(&edit_id)
    }

    pub fn edits(&self) -> impl Iterator<Item = &EditRecord> {
        self.edits.values()
    }

    pub fn pending_count(&self) -> usize {
        self.edits.values().filter(|e| e.state.is_pending()).count()
    }

    // ==========================================
    // 需求编辑
    // ==========================================

    /// 输入框当前显示文本（无编辑时为行上的值）
    pub fn demand_text(&self, row: &ProductRow) -> String {
        self.demand_cells
            .get(&row.id)
            .map(|cell| cell.text.clone())
            .unwrap_or_else(|| row.demand.to_string())
    }

    pub fn demand_cell(&self, row_id: &str) -> Option<&DemandCell> {
        self.demand_cells.get(row_id)
    }

    /// 用户输入（不发出调用）
    pub fn demand_input(&mut self, row: &ProductRow, text: &str) {
        let cell = self
            .demand_cells
            .entry(row.id.clone())
            .or_insert_with(|| DemandCell::new(row.demand));
        cell.text = text.to_string();
    }

    /// 输入框失焦
    ///
    /// # 返回
    /// - Ok(None): 文本未变化，不发出调用
    /// - Ok(Some(cmd)): 待发出的需求更新
    /// - Err: 文本不是非负整数（已入队错误通知，保留输入）
    pub fn demand_blur(
        &mut self,
        row: &ProductRow,
    ) -> Result<Option<RemoteCommand>, EditValidationError> {
        let Some(cell) = self.demand_cells.get(&row.id) else {
            return Ok(None);
        };
        if !cell.is_dirty() {
            return Ok(None);
        }

        let input = cell.text.trim().to_string();
        let demand = match input.parse::<i64>() {
            Ok(v) if v >= 0 => v,
            _ => {
                let err = EditValidationError::InvalidDemand { input };
                warn!(row_id = %row.id, error = %err, "需求输入非法，未发出调用");
                self.notifications.push(Notification::error(err.user_message()));
                return Err(err);
            }
        };

        let edit_id = self.begin_edit(&row.id, EditKind::Demand);
        if let Some(cell) = self.demand_cells.get_mut(&row.id) {
            cell.pending_edit = Some(edit_id);
        }
        info!(row_id = %row.id, demand, edit_id, "发出需求更新");

        Ok(Some(RemoteCommand::UpdateDemand {
            edit_id,
            row_name: row.name.clone(),
            request: UpdateDemandRequest {
                id: row.id.clone(),
                demand,
            },
        }))
    }

    // ==========================================
    // 库存调拨
    // ==========================================

    /// 可选目标仓（排除行所在仓）
    pub fn available_destinations(&self, row: &ProductRow) -> Vec<String> {
        self.warehouse_codes
            .iter()
            .filter(|code| **code != row.warehouse)
            .cloned()
            .collect()
    }

    pub fn transfer_form(&self, row_id: &str) -> Option<&TransferForm> {
        self.transfer_forms.get(row_id)
    }

    pub fn open_transfer(&mut self, row_id: &str) {
        self.transfer_forms
            .entry(row_id.to_string())
            .or_default()
            .open = true;
    }

    /// 关闭菜单（已填写内容保留）
    pub fn close_transfer(&mut self, row_id: &str) {
        if let Some(form) = self.transfer_forms.get_mut(row_id) {
            form.open = false;
        }
    }

    pub fn set_transfer_destination(&mut self, row_id: &str, destination: Option<&str>) {
        let form = self.transfer_forms.entry(row_id.to_string()).or_default();
        form.destination = destination.map(str::to_string);
    }

    pub fn set_transfer_amount(&mut self, row_id: &str, amount_text: &str) {
        let form = self.transfer_forms.entry(row_id.to_string()).or_default();
        form.amount_text = amount_text.to_string();
    }

    fn validate_transfer(
        &self,
        row: &ProductRow,
        form: &TransferForm,
    ) -> Result<(String, i64), EditValidationError> {
        let destination = match form.destination.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => return Err(EditValidationError::MissingDestination),
        };
        if destination == row.warehouse {
            return Err(EditValidationError::SameWarehouse {
                warehouse: destination,
            });
        }
        if !self.warehouse_codes.iter().any(|c| *c == destination) {
            return Err(EditValidationError::UnknownDestination {
                warehouse: destination,
            });
        }

        let input = form.amount_text.trim();
        let amount = match input.parse::<i64>() {
            Ok(v) if v > 0 => v,
            _ => {
                return Err(EditValidationError::InvalidAmount {
                    input: input.to_string(),
                })
            }
        };
        if amount > row.stock {
            return Err(EditValidationError::AmountExceedsStock { stock: row.stock });
        }
        Ok((destination, amount))
    }

    /// 提交调拨表单
    ///
    /// 校验失败时写入行内错误并入队错误通知，不发出调用。
    pub fn submit_transfer(&mut self, row: &ProductRow) -> Result<RemoteCommand, EditValidationError> {
        let form = self.transfer_forms.get(&row.id).cloned().unwrap_or_default();

        let (to_warehouse, amount) = match self.validate_transfer(row, &form) {
            Ok(v) => v,
            Err(err) => {
                warn!(row_id = %row.id, error = %err, "调拨校验失败，未发出调用");
                let message = err.user_message();
                let form = self.transfer_forms.entry(row.id.clone()).or_default();
                form.error = Some(message.clone());
                self.notifications.push(Notification::error(message));
                return Err(err);
            }
        };

        let edit_id = self.begin_edit(&row.id, EditKind::Transfer);
        let form = self.transfer_forms.entry(row.id.clone()).or_default();
        form.error = None;
        form.pending_edit = Some(edit_id);

        info!(
            row_id = %row.id,
            amount,
            from = %row.warehouse,
            to = %to_warehouse,
            edit_id,
            "发出调拨"
        );

        Ok(RemoteCommand::TransferStock {
            edit_id,
            request: TransferStockRequest {
                id: row.id.clone(),
                amount,
                from_warehouse: row.warehouse.clone(),
                to_warehouse,
            },
        })
    }

    // ==========================================
    // 结算
    // ==========================================

    /// 应用变更结算
    ///
    /// # 返回
    /// - true: 变更已确认，调用方需要整表重拉
    pub fn apply_settlement(&mut self, settlement: &Settlement) -> bool {
        match settlement {
            Settlement::Demand {
                edit_id,
                row_name,
                request,
                result,
            } => match result {
                Ok(_) => {
                    info!(edit_id, row_id = %request.id, "需求更新已确认");
                    self.settle_edit(*edit_id, EditState::Committed);
                    if let Some(cell) = self.demand_cells.get_mut(&request.id) {
                        cell.committed = request.demand;
                        if cell.pending_edit == Some(*edit_id) {
                            cell.pending_edit = None;
                        }
                    }
                    self.notifications.push(Notification::success(t_with_args(
                        "demand.updated_for",
                        &[("name", row_name)],
                    )));
                    true
                }
                Err(err) => {
                    warn!(edit_id, row_id = %request.id, error = %err, "需求更新失败");
                    self.settle_edit(*edit_id, EditState::Failed(err.to_string()));
                    if let Some(cell) = self.demand_cells.get_mut(&request.id) {
                        if cell.pending_edit == Some(*edit_id) {
                            cell.pending_edit = None;
                        }
                    }
                    self.notifications
                        .push(Notification::error(t("demand.update_failed")));
                    false
                }
            },
            Settlement::Transfer {
                edit_id,
                request,
                result,
            } => match result {
                Ok(ack) => {
                    info!(edit_id, row_id = %request.id, "调拨已确认");
                    self.settle_edit(*edit_id, EditState::Committed);
                    if let Some(form) = self.transfer_forms.get_mut(&request.id) {
                        form.clear();
                        form.open = false;
                        form.pending_edit = None;
                    }
                    let amount = ack.amount.to_string();
                    self.notifications.push(Notification::success(t_with_args(
                        "transfer.succeeded",
                        &[
                            ("amount", &amount),
                            ("from", &ack.from_warehouse),
                            ("to", &ack.to_warehouse),
                        ],
                    )));
                    true
                }
                Err(err) => {
                    warn!(edit_id, row_id = %request.id, error = %err, "调拨失败");
                    self.settle_edit(*edit_id, EditState::Failed(err.to_string()));
                    if let Some(form) = self.transfer_forms.get_mut(&request.id) {
                        form.open = true;
                        form.pending_edit = None;
                    }
                    self.notifications
                        .push(Notification::error(t("transfer.failed")));
                    false
                }
            },
            Settlement::Refetch { .. } => false,
        }
    }

    /// 整表替换后对齐输入框状态
    ///
    /// 未在途且文本与新值一致的输入框回到"无编辑"；失败编辑的输入保留。
    pub fn sync_rows(&mut self, rows: &[ProductRow]) {
        let by_id: HashMap<&str, &ProductRow> = rows.iter().map(|r| (r.id.as_str(), r)).collect();

        self.demand_cells.retain(|id, cell| {
            let Some(row) = by_id.get(id.as_str()) else {
                return false;
            };
            if cell.pending_edit.is_some() {
                return true;
            }
            cell.committed = row.demand;
            cell.is_dirty()
        });
        self.transfer_forms
            .retain(|id, _| by_id.contains_key(id.as_str()));
    }

    /// 取出并清空通知队列
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }
}
