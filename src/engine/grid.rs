// ==========================================
// 库存监控驾驶舱 - 交互式表格引擎
// ==========================================
// 职责: 多列排序、多字段筛选、分页、行选择、手工重排、列可见性
// 输入: 远端产品行 + 用户动作（GridAction）
// 输出: 当前可见页（GridPage）
// ==========================================
// 派生流水线: 手工顺序 → 筛选 → 排序 → 分页
// ==========================================

mod core;
mod pipeline;
mod view_state;


pub use core::{GridStateEngine, PageSelectionState};
pub use pipeline::{
    clamp_page_index, filter_rows, page_count, paginate, sort_rows, GridPage, VisibleRow,
};
pub use view_state::{
    array_move, reduce, ColumnFilter, ColumnPredicate, GridAction, SortKey, ViewState,
    DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS,
};
