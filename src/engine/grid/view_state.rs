// ==========================================
// 库存监控驾驶舱 - 表格视图状态
// ==========================================
// 职责: 视图状态值对象 + 动作枚举 + 纯归约函数
// 红线: reduce 不读写任何外部状态，同输入同输出
// 红线: 手工顺序与排序/筛选相互独立
// ==========================================

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductRow;
use crate::domain::types::{ColumnId, ManualOrderPolicy, SortDirection, StatusFilter};
use crate::engine::error::{EngineError, EngineResult};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// 默认每页条数选项
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

// ==========================================
// 排序键 / 列筛选
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: ColumnId,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(column: ColumnId) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: ColumnId) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// 列筛选谓词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnPredicate {
    /// 包含（大小写不敏感）
    Contains(String),
    /// 完全相等（大小写不敏感）
    Equals(String),
    /// 闭区间，仅数值列
    Range { min: Option<i64>, max: Option<i64> },
}

impl ColumnPredicate {
    pub fn matches(&self, row: &ProductRow, column: ColumnId) -> bool {
        match self {
            ColumnPredicate::Contains(text) => row
                .text_value(column)
                .map(|v| v.to_lowercase().contains(&text.to_lowercase()))
                .unwrap_or(false),
            ColumnPredicate::Equals(text) => row
                .text_value(column)
                .map(|v| v.to_lowercase() == text.to_lowercase())
                .unwrap_or(false),
            ColumnPredicate::Range { min, max } => match row.numeric_value(column) {
                Some(v) => min.map_or(true, |lo| v >= lo) && max.map_or(true, |hi| v <= hi),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: ColumnId,
    pub predicate: ColumnPredicate,
}

impl ColumnFilter {
    pub fn new(column: ColumnId, predicate: ColumnPredicate) -> Self {
        Self { column, predicate }
    }

    fn validate(&self) -> EngineResult<()> {
        if !self.column.is_sortable() {
            return Err(EngineError::InvalidColumnFilter {
                column: self.column,
                reason: "非数据列".to_string(),
            });
        }
        if matches!(self.predicate, ColumnPredicate::Range { .. }) && !self.column.is_numeric() {
            return Err(EngineError::InvalidColumnFilter {
                column: self.column,
                reason: "区间筛选仅适用于数值列".to_string(),
            });
        }
        Ok(())
    }
}

// ==========================================
// ViewState - 视图状态
// ==========================================

/// 表格视图状态（会话级、瞬态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    sort: Vec<SortKey>,
    column_filters: Vec<ColumnFilter>,
    search: String,
    status_filter: StatusFilter,
    page_index: usize,
    page_size: usize,
    selected: BTreeSet<String>,
    hidden_columns: BTreeSet<ColumnId>,
    manual_order: Vec<String>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort: Vec::new(),
            column_filters: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
            page_index: 0,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
            hidden_columns: BTreeSet::new(),
            manual_order: Vec::new(),
        }
    }

    pub fn sort(&self) -> &[SortKey] {
        &self.sort
    }

    pub fn column_filters(&self) -> &[ColumnFilter] {
        &self.column_filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn hidden_columns(&self) -> &BTreeSet<ColumnId> {
        &self.hidden_columns
    }

    pub fn manual_order(&self) -> &[String] {
        &self.manual_order
    }

    pub fn sort_direction(&self, column: ColumnId) -> Option<SortDirection> {
        self.sort
            .iter()
            .find(|k| k.column == column)
            .map(|k| k.direction)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

// ==========================================
// GridAction - 视图动作
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    /// 服务端行集合同步（ids 为服务端顺序）
    SyncRows {
        ids: Vec<String>,
        policy: ManualOrderPolicy,
    },
    SetFilter {
        search: String,
        status: StatusFilter,
    },
    SetSort(Vec<SortKey>),
    ToggleSort {
        column: ColumnId,
        multi: bool,
    },
    SetColumnFilter(ColumnFilter),
    ClearColumnFilter(ColumnId),
    /// 页码（调用方负责按页数夹取）
    SetPage(usize),
    SetPageSize(usize),
    ToggleSelection(String),
    SetSelection {
        ids: Vec<String>,
        selected: bool,
    },
    SetColumnVisible {
        column: ColumnId,
        visible: bool,
    },
    Reorder {
        from_id: String,
        to_id: String,
    },
}

// ==========================================
// reduce - 纯归约
// ==========================================

/// 归约视图状态
///
/// 误用（不可排序列、未知行等）返回错误，原状态不变。
pub fn reduce(state: &ViewState, action: GridAction) -> EngineResult<ViewState> {
    let mut next = state.clone();

    match action {
        GridAction::SyncRows { ids, policy } => {
            next.manual_order = merge_manual_order(&state.manual_order, &ids, policy);
            let present: BTreeSet<&String> = ids.iter().collect();
            next.selected.retain(|id| present.contains(id));
        }
        GridAction::SetFilter { search, status } => {
            next.search = search;
            next.status_filter = status;
            next.page_index = 0;
        }
        GridAction::SetSort(keys) => {
            if let Some(bad) = keys.iter().find(|k| !k.column.is_sortable()) {
                return Err(EngineError::ColumnNotSortable(bad.column));
            }
            let mut deduped: Vec<SortKey> = Vec::with_capacity(keys.len());
            for key in keys {
                if !deduped.iter().any(|k| k.column == key.column) {
                    deduped.push(key);
                }
            }
            next.sort = deduped;
        }
        GridAction::ToggleSort { column, multi } => {
            if !column.is_sortable() {
                return Err(EngineError::ColumnNotSortable(column));
            }
            let cycled = match state.sort_direction(column) {
                None => Some(SortDirection::Asc),
                Some(SortDirection::Asc) => Some(SortDirection::Desc),
                Some(SortDirection::Desc) => None,
            };
            if multi {
                match (cycled, next.sort.iter().position(|k| k.column == column)) {
                    (Some(direction), Some(pos)) => next.sort[pos].direction = direction,
                    (Some(direction), None) => next.sort.push(SortKey { column, direction }),
                    (None, Some(pos)) => {
                        next.sort.remove(pos);
                    }
                    (None, None) => {}
                }
            } else {
                next.sort = cycled
                    .map(|direction| vec![SortKey { column, direction }])
                    .unwrap_or_default();
            }
        }
        GridAction::SetColumnFilter(filter) => {
            filter.validate()?;
            match next
                .column_filters
                .iter()
                .position(|f| f.column == filter.column)
            {
                Some(pos) => next.column_filters[pos] = filter,
                None => next.column_filters.push(filter),
            }
            next.page_index = 0;
        }
        GridAction::ClearColumnFilter(column) => {
            next.column_filters.retain(|f| f.column != column);
            next.page_index = 0;
        }
        GridAction::SetPage(index) => {
            next.page_index = index;
        }
        GridAction::SetPageSize(size) => {
            if size == 0 {
                return Err(EngineError::InvalidPageSize(size));
            }
            next.page_size = size;
            next.page_index = 0;
        }
        GridAction::ToggleSelection(id) => {
            if !state.manual_order.contains(&id) {
                return Err(EngineError::UnknownRow(id));
            }
            if !next.selected.remove(&id) {
                next.selected.insert(id);
            }
        }
        GridAction::SetSelection { ids, selected } => {
            for id in ids {
                if selected {
                    next.selected.insert(id);
                } else {
                    next.selected.remove(&id);
                }
            }
        }
        GridAction::SetColumnVisible { column, visible } => {
            if !column.is_hideable() {
                return Err(EngineError::ColumnNotHideable(column));
            }
            if visible {
                next.hidden_columns.remove(&column);
            } else {
                next.hidden_columns.insert(column);
            }
        }
        GridAction::Reorder { from_id, to_id } => {
            next.manual_order = array_move(&state.manual_order, &from_id, &to_id)?;
        }
    }

    Ok(next)
}

/// 数组移动：下移落在目标之后，上移落在目标之前
pub fn array_move(order: &[String], from_id: &str, to_id: &str) -> EngineResult<Vec<String>> {
    let from = order
        .iter()
        .position(|id| id == from_id)
        .ok_or_else(|| EngineError::UnknownRow(from_id.to_string()))?;
    let to = order
        .iter()
        .position(|id| id == to_id)
        .ok_or_else(|| EngineError::UnknownRow(to_id.to_string()))?;

    let mut moved = order.to_vec();
    if from != to {
        let item = moved.remove(from);
        moved.insert(to, item);
    }
    Ok(moved)
}

/// 刷新后的手工顺序
fn merge_manual_order(
    current: &[String],
    server_ids: &[String],
    policy: ManualOrderPolicy,
) -> Vec<String> {
    match policy {
        ManualOrderPolicy::Reset => server_ids.to_vec(),
        ManualOrderPolicy::Preserve => {
            let incoming: BTreeSet<&String> = server_ids.iter().collect();
            let mut merged: Vec<String> = current
                .iter()
                .filter(|id| incoming.contains(id))
                .cloned()
                .collect();
            let kept: BTreeSet<String> = merged.iter().cloned().collect();
            merged.extend(server_ids.iter().filter(|id| !kept.contains(*id)).cloned());
            merged
        }
    }
}
