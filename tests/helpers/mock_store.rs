// ==========================================
// Mock 存储实现 - 记录所有调用，可注入失败
// ==========================================

use address_hierarchy_loader::repository::{
    AddressStore, RecordBatch, RepositoryError, RepositoryResult,
};
use address_hierarchy_loader::AddressTable;
use async_trait::async_trait;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// 一次存储调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    DeleteAll(AddressTable),
    InsertMany { table: AddressTable, codes: Vec<String> },
}

impl StoreCall {
    pub fn is_insert(&self) -> bool {
        matches!(self, StoreCall::InsertMany { .. })
    }
}

#[derive(Default)]
pub struct MockAddressStore {
    calls: Mutex<Vec<StoreCall>>,
    fail_delete: Option<AddressTable>,
    fail_insert_call: Option<usize>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl MockAddressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空指定表时失败
    pub fn failing_delete(table: AddressTable) -> Self {
        Self {
            fail_delete: Some(table),
            ..Self::default()
        }
    }

    /// 第 n 次 insert_many 调用失败（从 1 开始）
    pub fn failing_insert(n: usize) -> Self {
        Self {
            fail_insert_call: Some(n),
            ..Self::default()
        }
    }

    /// 完成 n 次调用后触发取消
    pub fn cancel_after(n: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((n, token)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<AddressTable> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::DeleteAll(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    /// 指定表的每次写入（按调用顺序）
    pub fn insert_calls(&self, table: AddressTable) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::InsertMany { table: t, codes } if t == table => Some(codes),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if let Some((n, token)) = &self.cancel_after {
            if calls.len() == *n {
                token.cancel();
            }
        }
    }

    fn insert_count(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.is_insert()).count()
    }
}

fn codes(records: &RecordBatch<'_>) -> Vec<String> {
    match records {
        RecordBatch::Regions(r) => r.iter().map(|x| x.code.clone()).collect(),
        RecordBatch::Provinces(r) => r.iter().map(|x| x.code.clone()).collect(),
        RecordBatch::Lgus(r) => r.iter().map(|x| x.code.clone()).collect(),
        RecordBatch::Barangays(r) => r.iter().map(|x| x.code.clone()).collect(),
    }
}

#[async_trait]
impl AddressStore for MockAddressStore {
    async fn delete_all(&self, table: AddressTable) -> RepositoryResult<()> {
        self.record(StoreCall::DeleteAll(table));
        if self.fail_delete == Some(table) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "permission denied for table {}",
                table
            )));
        }
        Ok(())
    }

    async fn insert_many(&self, records: RecordBatch<'_>) -> RepositoryResult<usize> {
        self.record(StoreCall::InsertMany {
            table: records.table(),
            codes: codes(&records),
        });
        if self.fail_insert_call == Some(self.insert_count()) {
            return Err(RepositoryError::DatabaseQueryError(
                "payload too large".to_string(),
            ));
        }
        Ok(records.len())
    }
}
