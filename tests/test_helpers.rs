// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库与本地数据服务
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use inventory_dashboard::db::open_and_prepare;
use inventory_dashboard::domain::ProductRow;
use inventory_dashboard::remote::LocalInventoryService;
use rusqlite::{params, Connection};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    open_and_prepare(&db_path)?;
    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_and_prepare(db_path)?)
}

/// 写入 global 配置
pub fn insert_test_config(conn: &Connection, entries: &[(&str, &str)]) -> Result<(), Box<dyn Error>> {
    for (key, value) in entries {
        conn.execute(
            "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
            params![key, value],
        )?;
    }
    Ok(())
}

/// 临时库上的本地数据服务（仓库列表已写入默认值）
pub fn create_local_service(
    rows: &[ProductRow],
) -> Result<(NamedTempFile, Arc<LocalInventoryService>), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path)?));
    let service = LocalInventoryService::from_connection(conn);

    let codes: Vec<String> = ["BLR-A", "BLR-B", "PNQ-C", "DEL-B"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    service.warehouses().replace_all(&codes)?;
    for row in rows {
        service.products().upsert(row)?;
    }

    Ok((temp_file, Arc::new(service)))
}
