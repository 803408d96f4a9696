// ==========================================
// 库存监控驾驶舱 - 表格状态引擎
// ==========================================
// 职责: 持有行工作副本与视图状态，对外暴露派生可见页
// 输入: 远端产品行 + 用户动作
// 输出: 可见页 / 选择汇总 / 分面统计
// 红线: 行 id 是视觉行与数据的唯一关联键
// 红线: 派生值每次按需重算，不做跨调用缓存
// ==========================================

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::domain::product::ProductRow;
use crate::domain::types::{ColumnId, ManualOrderPolicy, SortDirection, StatusFilter};
use crate::engine::classifier::classify_row;
use crate::engine::error::{EngineError, EngineResult};
use crate::perf::PerfGuard;

use super::pipeline::{
    clamp_page_index, filter_rows, page_count, paginate, passes_search_and_status, sort_rows,
    GridPage, VisibleRow,
};
use super::view_state::{
    reduce, ColumnFilter, ColumnPredicate, GridAction, SortKey, ViewState, DEFAULT_PAGE_SIZE,
    DEFAULT_PAGE_SIZE_OPTIONS,
};

/// 页头勾选框状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSelectionState {
    None,
    Some,
    All,
}

// ==========================================
// GridStateEngine - 表格状态引擎
// ==========================================
pub struct GridStateEngine {
    rows: HashMap<String, ProductRow>,
    state: ViewState,
    policy: ManualOrderPolicy,
    page_size_options: Vec<usize>,
}

impl GridStateEngine {
    pub fn new() -> Self {
        Self::with_options(
            DEFAULT_PAGE_SIZE,
            DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            ManualOrderPolicy::default(),
        )
    }

    /// 按配置构造
    ///
    /// # 参数
    /// - `page_size`: 默认每页条数（0 视为 1）
    /// - `page_size_options`: 每页条数下拉选项
    /// - `policy`: 刷新后手工顺序策略
    pub fn with_options(
        page_size: usize,
        page_size_options: Vec<usize>,
        policy: ManualOrderPolicy,
    ) -> Self {
        Self {
            rows: HashMap::new(),
            state: ViewState::new(page_size),
            policy,
            page_size_options,
        }
    }

    // ==========================================
    // 状态访问
    // ==========================================

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn policy(&self) -> ManualOrderPolicy {
        self.policy
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn row(&self, id: &str) -> Option<&ProductRow> {
        self.rows.get(id)
    }

    pub fn total_count(&self) -> usize {
        self.state.manual_order().len()
    }

    /// 手工顺序下的全部行
    pub fn base_rows(&self) -> Vec<&ProductRow> {
        self.state
            .manual_order()
            .iter()
            .filter_map(|id| self.rows.get(id))
            .collect()
    }

    /// 应用动作；失败时状态不变
    pub fn dispatch(&mut self, action: GridAction) -> EngineResult<()> {
        match reduce(&self.state, action) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "表格动作被拒绝");
                Err(e)
            }
        }
    }

    // ==========================================
    // 行集合
    // ==========================================

    /// 替换工作副本（其余视图状态不重置）
    ///
    /// 已选中但不再存在的 id 静默移出选择集；重复 id 仅保留首次出现。
    pub fn set_rows(&mut self, rows: Vec<ProductRow>) {
        let mut ids = Vec::with_capacity(rows.len());
        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            if by_id.contains_key(&row.id) {
                warn!(id = %row.id, "重复的行 id，已忽略");
                continue;
            }
            ids.push(row.id.clone());
            by_id.insert(row.id.clone(), row);
        }

        debug!(count = ids.len(), policy = %self.policy, "替换表格工作副本");
        self.rows = by_id;
        // SyncRows 不会失败
        if let Ok(next) = reduce(
            &self.state,
            GridAction::SyncRows {
                ids,
                policy: self.policy,
            },
        ) {
            self.state = next;
        }
    }

    // ==========================================
    // 筛选 / 排序
    // ==========================================

    pub fn apply_filter(&mut self, search: impl Into<String>, status: StatusFilter) {
        let search = search.into();
        // SetFilter 不会失败
        let _ = self.dispatch(GridAction::SetFilter { search, status });
    }

    pub fn apply_sort(&mut self, keys: Vec<SortKey>) -> EngineResult<()> {
        self.dispatch(GridAction::SetSort(keys))
    }

    /// 循环切换列排序：升序 → 降序 → 取消
    pub fn toggle_sort(&mut self, column: ColumnId, multi: bool) -> EngineResult<()> {
        self.dispatch(GridAction::ToggleSort { column, multi })
    }

    pub fn sort_direction(&self, column: ColumnId) -> Option<SortDirection> {
        self.state.sort_direction(column)
    }

    pub fn set_column_filter(
        &mut self,
        column: ColumnId,
        predicate: ColumnPredicate,
    ) -> EngineResult<()> {
        self.dispatch(GridAction::SetColumnFilter(ColumnFilter::new(
            column, predicate,
        )))
    }

    pub fn clear_column_filter(&mut self, column: ColumnId) {
        let _ = self.dispatch(GridAction::ClearColumnFilter(column));
    }

    /// 经筛选与排序后的全部行（分页前）
    pub fn filtered_rows(&self) -> Vec<&ProductRow> {
        let mut rows = filter_rows(
            self.base_rows(),
            self.state.search(),
            self.state.status_filter(),
            self.state.column_filters(),
        );
        sort_rows(&mut rows, self.state.sort());
        rows
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_rows().len()
    }

    // ==========================================
    // 分页
    // ==========================================

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_count(), self.state.page_size())
    }

    /// 当前生效页码（状态中的页码可能因行集缩小而越界，此处夹取）
    pub fn page_index(&self) -> usize {
        clamp_page_index(
            self.state.page_index(),
            self.filtered_count(),
            self.state.page_size(),
        )
    }

    pub fn set_page(&mut self, index: usize) {
        let clamped = clamp_page_index(index, self.filtered_count(), self.state.page_size());
        if clamped != index {
            debug!(requested = index, clamped, "页码越界，已夹取");
        }
        let _ = self.dispatch(GridAction::SetPage(clamped));
    }

    pub fn set_page_size(&mut self, size: usize) -> EngineResult<()> {
        self.dispatch(GridAction::SetPageSize(size))
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.set_page(self.page_index() + 1);
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.set_page(self.page_index() - 1);
        }
    }

    pub fn first_page(&mut self) {
        self.set_page(0);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.page_count().saturating_sub(1));
    }

    /// 当前可见页
    pub fn visible_page(&self) -> GridPage {
        let _perf = PerfGuard::new("grid_visible_page");

        let filtered = self.filtered_rows();
        let page_size = self.state.page_size();
        let page_index = clamp_page_index(self.state.page_index(), filtered.len(), page_size);

        let rows = paginate(&filtered, page_index, page_size)
            .iter()
            .map(|row| VisibleRow {
                row: (*row).clone(),
                status: classify_row(row),
                selected: self.state.is_selected(&row.id),
            })
            .collect();

        debug!(
            page_index,
            page_size,
            filtered = filtered.len(),
            total = self.total_count(),
            "派生可见页"
        );

        GridPage {
            rows,
            page_index,
            page_size,
            page_count: page_count(filtered.len(), page_size),
            filtered_count: filtered.len(),
            total_count: self.total_count(),
        }
    }

    fn current_page_ids(&self) -> Vec<String> {
        let filtered = self.filtered_rows();
        let page_size = self.state.page_size();
        let page_index = clamp_page_index(self.state.page_index(), filtered.len(), page_size);
        paginate(&filtered, page_index, page_size)
            .iter()
            .map(|row| row.id.clone())
            .collect()
    }

    // ==========================================
    // 选择
    // ==========================================

    pub fn toggle_selection(&mut self, id: &str) -> EngineResult<()> {
        self.dispatch(GridAction::ToggleSelection(id.to_string()))
    }

    /// 全选/取消全选仅作用于当前页
    pub fn toggle_select_all_on_page(&mut self, selected: bool) {
        let ids = self.current_page_ids();
        let _ = self.dispatch(GridAction::SetSelection { ids, selected });
    }

    pub fn page_selection_state(&self) -> PageSelectionState {
        let ids = self.current_page_ids();
        let hit = ids.iter().filter(|id| self.state.is_selected(id)).count();
        if hit == 0 {
            PageSelectionState::None
        } else if hit == ids.len() {
            PageSelectionState::All
        } else {
            PageSelectionState::Some
        }
    }

    /// 已选中且通过筛选的行数
    pub fn selected_count(&self) -> usize {
        self.filtered_rows()
            .iter()
            .filter(|row| self.state.is_selected(&row.id))
            .count()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.state.selected().iter().cloned().collect()
    }

    // ==========================================
    // 手工排序
    // ==========================================

    /// 在手工顺序中移动 from 到 to 的位置（与排序/筛选无关）
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> EngineResult<()> {
        if from_id == to_id {
            return Ok(());
        }
        debug!(from_id, to_id, "手工重排");
        self.dispatch(GridAction::Reorder {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
        })
    }

    // ==========================================
    // 列可见性
    // ==========================================

    pub fn set_column_visible(&mut self, column: ColumnId, visible: bool) -> EngineResult<()> {
        self.dispatch(GridAction::SetColumnVisible { column, visible })
    }

    pub fn toggle_column_visibility(&mut self, column: ColumnId) -> EngineResult<()> {
        let visible = self.is_column_visible(column);
        self.set_column_visible(column, !visible)
    }

    pub fn is_column_visible(&self, column: ColumnId) -> bool {
        !self.state.hidden_columns().contains(&column)
    }

    /// 可见列（展示顺序）
    pub fn visible_columns(&self) -> Vec<ColumnId> {
        ColumnId::ALL
            .iter()
            .copied()
            .filter(|c| self.is_column_visible(*c))
            .collect()
    }

    // ==========================================
    // 分面
    // ==========================================

    /// 列分面：通过搜索/状态筛选的行中，各取值及其行数（按取值升序）
    pub fn facet_values(&self, column: ColumnId) -> Vec<(String, usize)> {
        let needle = self.state.search().to_lowercase();
        let status = self.state.status_filter();

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for row in self.base_rows() {
            if !passes_search_and_status(row, &needle, status) {
                continue;
            }
            if let Some(value) = row.text_value(column) {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    /// 按列名解析（供外壳传入字符串列标识）
    pub fn parse_column(name: &str) -> EngineResult<ColumnId> {
        ColumnId::parse(name).ok_or_else(|| EngineError::UnknownColumn(name.to_string()))
    }
}

impl Default for GridStateEngine {
    fn default() -> Self {
        Self::new()
    }
}
