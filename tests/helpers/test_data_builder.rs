// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{Duration, NaiveDate};
use inventory_dashboard::domain::{ProductRow, TrendPoint};

// ==========================================
// ProductRow 构建器
// ==========================================

pub struct ProductBuilder {
    id: String,
    name: Option<String>,
    sku: Option<String>,
    warehouse: String,
    stock: i64,
    demand: i64,
}

impl ProductBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            sku: None,
            warehouse: "BLR-A".to_string(),
            stock: 10,
            demand: 10,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn sku(mut self, sku: &str) -> Self {
        self.sku = Some(sku.to_string());
        self
    }

    pub fn warehouse(mut self, warehouse: &str) -> Self {
        self.warehouse = warehouse.to_string();
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn demand(mut self, demand: i64) -> Self {
        self.demand = demand;
        self
    }

    pub fn build(self) -> ProductRow {
        let name = self.name.unwrap_or_else(|| format!("Product {}", self.id));
        let sku = self.sku.unwrap_or_else(|| format!("SKU-{}", self.id));
        ProductRow::new(self.id, name, sku, self.warehouse, self.stock, self.demand)
    }
}

/// n 行：id 为 "r1".."rn"，库存递增、需求固定
pub fn numbered_rows(n: usize) -> Vec<ProductRow> {
    (1..=n)
        .map(|i| {
            ProductBuilder::new(&format!("r{}", i))
                .stock(i as i64)
                .demand(5)
                .build()
        })
        .collect()
}

/// 以 `today` 为基准、按天偏移生成趋势点
pub fn trend_at_offsets(today: NaiveDate, offsets: &[i64]) -> Vec<TrendPoint> {
    offsets
        .iter()
        .map(|off| TrendPoint::new(today + Duration::days(*off), 100 - *off, 50))
        .collect()
}
