// ==========================================
// 四级行政区划导入 - 地址存储 Trait
// ==========================================
// 职责: 定义四张表的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做 deleteAll / insertMany
// ==========================================

use crate::domain::{AddressTable, Barangay, Lgu, Province, Region};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;

// ==========================================
// RecordBatch - 一次 insertMany 的载荷
// ==========================================
// 借用抽取结果中的切片，不复制记录
#[derive(Debug, Clone, Copy)]
pub enum RecordBatch<'a> {
    Regions(&'a [Region]),
    Provinces(&'a [Province]),
    Lgus(&'a [Lgu]),
    Barangays(&'a [Barangay]),
}

impl RecordBatch<'_> {
    pub fn table(&self) -> AddressTable {
        match self {
            RecordBatch::Regions(_) => AddressTable::Regions,
            RecordBatch::Provinces(_) => AddressTable::Provinces,
            RecordBatch::Lgus(_) => AddressTable::Lgus,
            RecordBatch::Barangays(_) => AddressTable::Barangays,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RecordBatch::Regions(r) => r.len(),
            RecordBatch::Provinces(r) => r.len(),
            RecordBatch::Lgus(r) => r.len(),
            RecordBatch::Barangays(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ==========================================
// StoreStep - 单个存储操作
// ==========================================
#[derive(Debug, Clone, Copy)]
pub enum StoreStep<'a> {
    Delete(AddressTable),
    Insert(RecordBatch<'a>),
}

/// 单事务替换失败时，标明失败的步骤下标
#[derive(Debug)]
pub struct StepFailure {
    pub step: usize,
    pub error: RepositoryError,
}

// ==========================================
// AddressStore Trait
// ==========================================
// 用途: 全量替换所需的最小存储能力
// 实现者: SqliteAddressStore（使用 rusqlite）
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// 清空整张表
    ///
    /// # 返回
    /// - Ok(()): 清空成功
    /// - Err: 数据库错误（由调用方视为致命）
    async fn delete_all(&self, table: AddressTable) -> RepositoryResult<()>;

    /// 批量写入一组记录（表由载荷类型决定）
    ///
    /// # 返回
    /// - Ok(usize): 写入行数
    /// - Err: 数据库错误（本批次回滚，已提交批次不受影响）
    async fn insert_many(&self, records: RecordBatch<'_>) -> RepositoryResult<usize>;
}

// ==========================================
// TransactionalAddressStore Trait
// ==========================================
// 用途: 支持把整个删除 + 写入计划放进一个事务
#[async_trait]
pub trait TransactionalAddressStore: AddressStore {
    /// 在单个事务内依次执行全部步骤
    ///
    /// # 返回
    /// - Ok(usize): 写入总行数（事务已提交）
    /// - Err(StepFailure): 失败步骤下标 + 原因（事务已回滚，原数据保持不变）
    async fn replace_all_atomic(&self, steps: &[StoreStep<'_>]) -> Result<usize, StepFailure>;
}
