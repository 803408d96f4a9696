// Dev utility: back up and reset the dashboard database, then seed demo data.
//
// Usage:
//   cargo run --bin seed_demo_db -- [db_path] [product_count]

use chrono::{Local, Utc};
use std::error::Error;
use std::fs;
use std::path::Path;

use inventory_dashboard::app::get_default_db_path;
use inventory_dashboard::config::{config_keys, defaults, ConfigManager};
use inventory_dashboard::domain::KpiSnapshot;
use inventory_dashboard::remote::{seed_demo_data, LocalInventoryService};

const DEFAULT_PRODUCT_COUNT: usize = 60;
const TREND_DAYS: i64 = 120;

fn main() -> Result<(), Box<dyn Error>> {
    inventory_dashboard::logging::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    let product_count = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PRODUCT_COUNT)
        .max(1);

    backup_and_reset_db(&db_path)?;

    let service = LocalInventoryService::open(&db_path)?;
    let summary = seed_demo_data(&service, Utc::now().date_naive(), product_count, TREND_DAYS)?;

    // 90 天区间写入固定快照；7d / 30d 由产品汇总推导
    service
        .kpis()
        .upsert("90d", &KpiSnapshot::new(48_250.0, 36_900.0, 87.5))?;

    let config = ConfigManager::new(&db_path)?;
    config.set_global_config_value(config_keys::RANGE_TOKEN, defaults::RANGE_TOKEN)?;
    config.set_global_config_value(
        config_keys::WAREHOUSE_CODES,
        &defaults::WAREHOUSE_CODES.join(","),
    )?;
    config.set_global_config_value(config_keys::MANUAL_ORDER_ON_REFETCH, "PRESERVE")?;

    eprintln!(
        "Seeded {}: products={}, trend_points={}, warehouses={}",
        db_path, summary.products, summary.trend_points, summary.warehouses
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
