// ==========================================
// 库存监控驾驶舱 - 表格派生视图流水线
// ==========================================
// 顺序固定: 手工顺序 → 文本/状态/列筛选 → 排序 → 分页
// 红线: 每个阶段都是纯变换，不缓存
// ==========================================

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductRow;
use crate::domain::types::{ColumnId, ProductStatus, SortDirection, StatusFilter};
use crate::engine::classifier::classify_row;

use super::view_state::{ColumnFilter, SortKey};

/// 页面行（附带派生状态）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRow {
    pub row: ProductRow,
    pub status: ProductStatus,
    pub selected: bool,
}

/// 当前可见页
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPage {
    pub rows: Vec<VisibleRow>,
    /// 实际生效的页码（已夹取）
    pub page_index: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub filtered_count: usize,
    pub total_count: usize,
}

// ==========================================
// 筛选
// ==========================================

/// 搜索 + 状态（不含列筛选）
pub fn passes_search_and_status(row: &ProductRow, needle_lower: &str, status: StatusFilter) -> bool {
    row.matches_search(needle_lower) && status.matches(classify_row(row))
}

pub fn filter_rows<'a>(
    rows: impl IntoIterator<Item = &'a ProductRow>,
    search: &str,
    status: StatusFilter,
    column_filters: &[ColumnFilter],
) -> Vec<&'a ProductRow> {
    let needle = search.to_lowercase();
    rows.into_iter()
        .filter(|row| passes_search_and_status(row, &needle, status))
        .filter(|row| {
            column_filters
                .iter()
                .all(|f| f.predicate.matches(row, f.column))
        })
        .collect()
}

// ==========================================
// 排序
// ==========================================

fn compare_column(a: &ProductRow, b: &ProductRow, column: ColumnId) -> Ordering {
    if column.is_numeric() {
        return a.numeric_value(column).cmp(&b.numeric_value(column));
    }
    let av = a.text_value(column).unwrap_or_default();
    let bv = b.text_value(column).unwrap_or_default();
    av.to_lowercase().cmp(&bv.to_lowercase())
}

/// 稳定多键排序（相等时保留排序前的相对顺序）
pub fn sort_rows(rows: &mut [&ProductRow], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for key in keys {
            let ord = compare_column(a, b, key.column);
            let ord = match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

// ==========================================
// 分页
// ==========================================

/// 页数 = ceil(N / P)
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// 夹取页码到 [0, max(页数, 1) - 1]
pub fn clamp_page_index(index: usize, total: usize, page_size: usize) -> usize {
    let last = page_count(total, page_size).max(1) - 1;
    index.min(last)
}

pub fn paginate<T>(rows: &[T], page_index: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &rows[..0];
    }
    let start = page_index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}
