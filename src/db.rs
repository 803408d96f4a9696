// ==========================================
// 库存监控驾驶舱 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 本地数据服务建表（幂等）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

use crate::perf::install_sqlite_tracing;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置（含 SQL 统计钩子）
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 建表（幂等）
///
/// product.stock 约束为非负：本地数据服务唯一保留的服务端约束。
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS warehouse (
            code TEXT PRIMARY KEY,
            sort_order INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS product (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            sku TEXT NOT NULL,
            warehouse TEXT NOT NULL,
            stock INTEGER NOT NULL CHECK (stock >= 0),
            demand INTEGER NOT NULL CHECK (demand >= 0),
            seq INTEGER NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_product_sku_wh ON product (sku, warehouse);

        CREATE TABLE IF NOT EXISTS trend_point (
            date TEXT PRIMARY KEY,
            stock_value INTEGER NOT NULL,
            demand_value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kpi_snapshot (
            range_token TEXT PRIMARY KEY,
            total_stock REAL NOT NULL,
            total_demand REAL NOT NULL,
            fill_rate REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 打开并建表；schema_version 落后时仅告警
pub fn open_and_prepare(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    ensure_schema(&conn)?;
    match read_schema_version(&conn)? {
        Some(v) if v < CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                db_path,
                found = v,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本落后"
            );
        }
        _ => {}
    }
    Ok(conn)
}
