// ==========================================
// 库存监控驾驶舱 - KPI 快照仓储
// ==========================================

use crate::domain::trend::KpiSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// KPI 快照仓储（每个区间令牌一行）
pub struct KpiRepository {
    conn: Arc<Mutex<Connection>>,
}

impl KpiRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_by_range(&self, range_token: &str) -> RepositoryResult<Option<KpiSnapshot>> {
        let conn = self.get_conn()?;
        let snapshot = conn
            .query_row(
                r#"
                SELECT total_stock, total_demand, fill_rate
                FROM kpi_snapshot
                WHERE range_token = ?1
                "#,
                params![range_token],
                |row| Ok(KpiSnapshot::new(row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(snapshot)
    }

    pub fn upsert(&self, range_token: &str, snapshot: &KpiSnapshot) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kpi_snapshot (range_token, total_stock, total_demand, fill_rate)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(range_token) DO UPDATE SET
                total_stock = excluded.total_stock,
                total_demand = excluded.total_demand,
                fill_rate = excluded.fill_rate
            "#,
            params![
                range_token,
                snapshot.total_stock,
                snapshot.total_demand,
                snapshot.fill_rate,
            ],
        )?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM kpi_snapshot", [])?)
    }
}
