// ==========================================
// 库存监控驾驶舱 - 趋势序列仓储
// ==========================================

use crate::domain::trend::TrendPoint;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 趋势点仓储（trend_point 表，按日期唯一）
pub struct TrendRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TrendRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询 since 及之后的点（日期升序）
    pub fn list_since(&self, since: NaiveDate) -> RepositoryResult<Vec<TrendPoint>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT date, stock_value, demand_value
            FROM trend_point
            WHERE date >= ?1
            ORDER BY date ASC
            "#,
        )?;

        let raw = stmt
            .query_map(params![since.format("%Y-%m-%d").to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(date, stock, demand)| {
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "trend_point.date".to_string(),
                        message: format!("{} ({})", e, date),
                    }
                })?;
                Ok(TrendPoint::new(date, stock, demand))
            })
            .collect()
    }

    pub fn upsert(&self, point: &TrendPoint) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO trend_point (date, stock_value, demand_value)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(date) DO UPDATE SET
                stock_value = excluded.stock_value,
                demand_value = excluded.demand_value
            "#,
            params![
                point.date.format("%Y-%m-%d").to_string(),
                point.stock_value,
                point.demand_value,
            ],
        )?;
        Ok(())
    }

    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM trend_point", [])?)
    }
}
