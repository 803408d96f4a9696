// ==========================================
// 库存监控驾驶舱 - 行状态分类引擎
// ==========================================
// 职责: 由 (stock, demand) 派生产品状态
// 红线: 纯函数，不缓存；stock == demand 判为 low 而非 healthy
// ==========================================

use crate::domain::product::ProductRow;
use crate::domain::types::ProductStatus;

/// 对任意 (stock, demand) 给出状态（含 0 与负数，不做校验）
pub fn classify(stock: i64, demand: i64) -> ProductStatus {
    if stock > demand {
        ProductStatus::Healthy
    } else if stock == demand {
        ProductStatus::Low
    } else {
        ProductStatus::Critical
    }
}

/// 行级便捷入口
pub fn classify_row(row: &ProductRow) -> ProductStatus {
    classify(row.stock, row.demand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(100, 100), ProductStatus::Low);
        assert_eq!(classify(100, 99), ProductStatus::Healthy);
        assert_eq!(classify(99, 100), ProductStatus::Critical);
    }

    #[test]
    fn test_classify_zero_and_negative() {
        assert_eq!(classify(0, 0), ProductStatus::Low);
        assert_eq!(classify(0, 1), ProductStatus::Critical);
        assert_eq!(classify(-1, -5), ProductStatus::Healthy);
    }

    #[test]
    fn test_classify_exhaustive_small_grid() {
        for s in -3..=3 {
            for d in -3..=3 {
                let expected = if s > d {
                    ProductStatus::Healthy
                } else if s == d {
                    ProductStatus::Low
                } else {
                    ProductStatus::Critical
                };
                assert_eq!(classify(s, d), expected, "s={}, d={}", s, d);
            }
        }
    }
}
