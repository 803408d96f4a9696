// ==========================================
// 库存监控驾驶舱 - 仓库代码仓储
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct WarehouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WarehouseRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 仓库代码（按 sort_order）
    pub fn list_codes(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT code FROM warehouse ORDER BY sort_order ASC, code ASC")?;
        let codes = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(codes)
    }

    /// 整体替换仓库列表（保持传入顺序）
    pub fn replace_all(&self, codes: &[String]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        tx.execute("DELETE FROM warehouse", [])?;
        for (i, code) in codes.iter().enumerate() {
            tx.execute(
                "INSERT INTO warehouse (code, sort_order) VALUES (?1, ?2)",
                params![code, i as i64],
            )?;
        }
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}
