// ==========================================
// 库存监控驾驶舱 - 产品行实体
// ==========================================
// 职责: 表格工作副本中的一行产品数据
// 红线: id 在工作集内唯一，且在重排/筛选下保持稳定
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::ColumnId;

/// 产品行
///
/// stock / demand 使用 i64：分类函数需要对任意输入有定义，
/// 非负校验由调用方（数据服务/编辑校验）负责。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    /// 行标识（视觉行与数据之间唯一的关联键）
    pub id: String,
    /// 产品名称
    pub name: String,
    pub sku: String,
    /// 仓库代码（如 BLR-A）
    pub warehouse: String,
    /// 当前库存
    pub stock: i64,
    /// 当前需求
    pub demand: i64,
}

impl ProductRow {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        warehouse: impl Into<String>,
        stock: i64,
        demand: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            warehouse: warehouse.into(),
            stock,
            demand,
        }
    }

    /// 全文检索：名称 / SKU / 仓库 任一包含（needle 需已转小写）
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        if needle_lower.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle_lower)
            || self.sku.to_lowercase().contains(needle_lower)
            || self.warehouse.to_lowercase().contains(needle_lower)
    }

    /// 文本列取值（数值列返回其十进制文本，功能列返回 None）
    pub fn text_value(&self, column: ColumnId) -> Option<String> {
        match column {
            ColumnId::Name => Some(self.name.clone()),
            ColumnId::Sku => Some(self.sku.clone()),
            ColumnId::Warehouse => Some(self.warehouse.clone()),
            ColumnId::Stock => Some(self.stock.to_string()),
            ColumnId::Demand => Some(self.demand.to_string()),
            ColumnId::Drag | ColumnId::Select | ColumnId::Actions => None,
        }
    }

    /// 数值列取值
    pub fn numeric_value(&self, column: ColumnId) -> Option<i64> {
        match column {
            ColumnId::Stock => Some(self.stock),
            ColumnId::Demand => Some(self.demand),
            _ => None,
        }
    }
}
