// ==========================================
// 四级行政区划导入 - 地址存储 SQLite 实现
// ==========================================
// 职责: 实现四张表的清空 / 批量写入（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::AddressTable;
use crate::repository::address_repo::{
    AddressStore, RecordBatch, StepFailure, StoreStep, TransactionalAddressStore,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// SqliteAddressStore
// ==========================================
pub struct SqliteAddressStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteAddressStore {
    /// 打开数据库并确保表结构存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责 PRAGMA 与建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 统计表行数（供调用方核对写入结果）
    pub fn count_rows(&self, table: AddressTable) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 清空整张表（表名来自固定枚举，不接受外部输入）
    fn delete_all_in(conn: &Connection, table: AddressTable) -> RepositoryResult<()> {
        let sql = format!("DELETE FROM {}", table.table_name());
        let removed = conn.execute(&sql, [])?;
        debug!(table = %table, removed = removed, "表已清空");
        Ok(())
    }

    /// 写入一组记录（调用方负责事务边界）
    fn insert_records_in(conn: &Connection, records: &RecordBatch<'_>) -> RepositoryResult<usize> {
        let mut count = 0;

        match records {
            RecordBatch::Regions(regions) => {
                let mut stmt = conn.prepare("INSERT INTO regions (code, name) VALUES (?1, ?2)")?;
                for region in regions.iter() {
                    stmt.execute(params![region.code, region.name])?;
                    count += 1;
                }
            }
            RecordBatch::Provinces(provinces) => {
                let mut stmt = conn.prepare(
                    "INSERT INTO provinces (code, name, region_code) VALUES (?1, ?2, ?3)",
                )?;
                for province in provinces.iter() {
                    stmt.execute(params![province.code, province.name, province.region_code])?;
                    count += 1;
                }
            }
            RecordBatch::Lgus(lgus) => {
                let mut stmt = conn.prepare(
                    "INSERT INTO lgus (code, name, province_code) VALUES (?1, ?2, ?3)",
                )?;
                for lgu in lgus.iter() {
                    stmt.execute(params![lgu.code, lgu.name, lgu.province_code])?;
                    count += 1;
                }
            }
            RecordBatch::Barangays(barangays) => {
                let mut stmt = conn.prepare(
                    r#"
                    INSERT INTO barangays (code, name, province_code, lgu_code)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )?;
                for barangay in barangays.iter() {
                    stmt.execute(params![
                        barangay.code,
                        barangay.name,
                        barangay.province_code,
                        barangay.lgu_code,
                    ])?;
                    count += 1;
                }
            }
        }

        Ok(count)
    }
}

#[async_trait]
impl AddressStore for SqliteAddressStore {
    async fn delete_all(&self, table: AddressTable) -> RepositoryResult<()> {
        let conn = self.lock()?;
        Self::delete_all_in(&conn, table)
    }

    /// 批量写入（单批次事务化）
    async fn insert_many(&self, records: RecordBatch<'_>) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        let count = Self::insert_records_in(&tx, &records)?;

        tx.commit()?;
        Ok(count)
    }
}

#[async_trait]
impl TransactionalAddressStore for SqliteAddressStore {
    async fn replace_all_atomic(&self, steps: &[StoreStep<'_>]) -> Result<usize, StepFailure> {
        let conn = self.lock().map_err(|error| StepFailure { step: 0, error })?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StepFailure {
                step: 0,
                error: RepositoryError::DatabaseTransactionError(e.to_string()),
            })?;

        let mut inserted = 0;
        for (idx, step) in steps.iter().enumerate() {
            let result = match step {
                StoreStep::Delete(table) => Self::delete_all_in(&tx, *table).map(|_| 0),
                StoreStep::Insert(records) => Self::insert_records_in(&tx, records),
            };

            match result {
                Ok(n) => inserted += n,
                // tx 析构时自动回滚
                Err(error) => return Err(StepFailure { step: idx, error }),
            }
        }

        tx.commit().map_err(|e| StepFailure {
            step: steps.len(),
            error: RepositoryError::DatabaseTransactionError(e.to_string()),
        })?;

        Ok(inserted)
    }
}
