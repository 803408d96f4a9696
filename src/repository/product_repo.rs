// ==========================================
// 库存监控驾驶舱 - 产品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

use crate::domain::product::ProductRow;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex};

// ==========================================
// ProductRepository - 产品仓储
// ==========================================
/// 产品仓储
/// 职责: 管理 product 表的读写
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = "id, name, sku, warehouse, stock, demand";

fn map_row(row: &Row<'_>) -> rusqlite::Result<ProductRow> {
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        sku: row.get(2)?,
        warehouse: row.get(3)?,
        stock: row.get(4)?,
        demand: row.get(5)?,
    })
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 全部产品（按录入顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM product ORDER BY seq ASC, id ASC",
            SELECT_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<ProductRow>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM product WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// 插入或覆盖
    pub fn upsert(&self, product: &ProductRow) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO product (id, name, sku, warehouse, stock, demand, seq)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, (SELECT COALESCE(MAX(seq), 0) + 1 FROM product))
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                sku = excluded.sku,
                warehouse = excluded.warehouse,
                stock = excluded.stock,
                demand = excluded.demand,
                updated_at = datetime('now')
            "#,
            params![
                product.id,
                product.name,
                product.sku,
                product.warehouse,
                product.stock,
                product.demand,
            ],
        )?;
        Ok(())
    }

    /// 更新需求，返回更新后的行
    pub fn update_demand(&self, id: &str, demand: i64) -> RepositoryResult<ProductRow> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE product SET demand = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![demand, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "product".to_string(),
                id: id.to_string(),
            });
        }
        let row = conn.query_row(
            &format!("SELECT {} FROM product WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            map_row,
        )?;
        Ok(row)
    }

    /// 调拨：源行扣减，目标仓同 SKU 行增加（不存在则以 new_id 新建）
    ///
    /// 单事务完成；库存不足由 CHECK 约束兜底。
    pub fn transfer_stock(
        &self,
        id: &str,
        amount: i64,
        to_warehouse: &str,
        new_id: &str,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let source = tx
            .query_row(
                &format!("SELECT {} FROM product WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_row,
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "product".to_string(),
                id: id.to_string(),
            })?;

        tx.execute(
            "UPDATE product SET stock = stock - ?1, updated_at = datetime('now') WHERE id = ?2",
            params![amount, id],
        )?;

        Self::credit_destination(&tx, &source, amount, to_warehouse, new_id)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    fn credit_destination(
        tx: &Transaction<'_>,
        source: &ProductRow,
        amount: i64,
        to_warehouse: &str,
        new_id: &str,
    ) -> RepositoryResult<()> {
        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM product WHERE sku = ?1 AND warehouse = ?2 AND id <> ?3 LIMIT 1",
                params![source.sku, to_warehouse, source.id],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(dest_id) => {
                tx.execute(
                    "UPDATE product SET stock = stock + ?1, updated_at = datetime('now') WHERE id = ?2",
                    params![amount, dest_id],
                )?;
            }
            None => {
                tx.execute(
                    r#"
                    INSERT INTO product (id, name, sku, warehouse, stock, demand, seq)
                    VALUES (?1, ?2, ?3, ?4, ?5, 0, (SELECT COALESCE(MAX(seq), 0) + 1 FROM product))
                    "#,
                    params![new_id, source.name, source.sku, to_warehouse, amount],
                )?;
            }
        }
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n = conn.query_row("SELECT COUNT(*) FROM product", [], |row| row.get(0))?;
        Ok(n)
    }

    /// 汇总：(Σstock, Σdemand, Σmin(stock, demand))
    pub fn totals(&self) -> RepositoryResult<(i64, i64, i64)> {
        let conn = self.get_conn()?;
        let totals = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(stock), 0),
                COALESCE(SUM(demand), 0),
                COALESCE(SUM(MIN(stock, demand)), 0)
            FROM product
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(totals)
    }

    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(conn.execute("DELETE FROM product", [])?)
    }
}
