// ==========================================
// 库存监控驾驶舱 - 演示数据生成
// ==========================================
// 职责: 为本地数据服务生成可复现的演示数据（产品/仓库/趋势/KPI）
// 红线: 生成结果只依赖输入参数，不使用随机数
// ==========================================

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::config::defaults;
use crate::domain::product::ProductRow;
use crate::domain::trend::TrendPoint;
use crate::remote::error::ServiceResult;
use crate::remote::local_service::LocalInventoryService;

const PRODUCT_NAMES: [&str; 12] = [
    "Steel Bolt",
    "Copper Wire",
    "Hex Nut",
    "Rubber Gasket",
    "Ball Bearing",
    "Pvc Pipe",
    "Drill Bit",
    "Cable Tie",
    "Hinge",
    "Washer",
    "Spring Clip",
    "Anchor Screw",
];

/// 生成结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoSeedSummary {
    pub products: usize,
    pub trend_points: usize,
    pub warehouses: usize,
}

/// 第 i 个演示产品（库存/需求按固定步长错开，三种状态都会出现）
pub fn demo_product(i: usize) -> ProductRow {
    let codes = defaults::WAREHOUSE_CODES;
    let name = PRODUCT_NAMES[i % PRODUCT_NAMES.len()];
    let stock = ((i * 37) % 120) as i64;
    let demand = if i % 7 == 5 {
        stock
    } else {
        ((i * 53 + 11) % 120) as i64
    };
    ProductRow::new(
        format!("P{:04}", i + 1),
        format!("{} #{}", name, i / PRODUCT_NAMES.len() + 1),
        format!("SKU-{:05}", 10_000 + i),
        codes[i % codes.len()],
        stock,
        demand,
    )
}

/// 截止 `today`（含）的 `days` 天趋势
pub fn demo_trend(today: NaiveDate, days: i64) -> Vec<TrendPoint> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let wave = (offset % 14) as i64;
            TrendPoint::new(date, 400 + wave * 9, 350 + (13 - wave) * 7)
        })
        .collect()
}

/// 清空并写入演示数据
pub fn seed_demo_data(
    service: &LocalInventoryService,
    today: NaiveDate,
    product_count: usize,
    trend_days: i64,
) -> ServiceResult<DemoSeedSummary> {
    service.products().delete_all()?;
    service.trends().delete_all()?;
    service.kpis().delete_all()?;

    let codes = defaults::warehouse_codes();
    service.warehouses().replace_all(&codes)?;

    for i in 0..product_count {
        service.products().upsert(&demo_product(i))?;
    }

    let trend = demo_trend(today, trend_days);
    for point in &trend {
        service.trends().upsert(point)?;
    }

    let summary = DemoSeedSummary {
        products: product_count,
        trend_points: trend.len(),
        warehouses: codes.len(),
    };
    info!(?summary, "演示数据已写入");
    Ok(summary)
}
