// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 同一导入器上写入进行中时，第二次调用被拒绝且不触碰存储
// ==========================================

mod helpers;
mod test_helpers;

use address_hierarchy_loader::importer::{ImportError, RawTable};
use address_hierarchy_loader::repository::{AddressStore, RecordBatch, RepositoryResult};
use address_hierarchy_loader::{logging, AddressImporter, AddressTable, LoadStatus, LoaderState};
use async_trait::async_trait;
use helpers::mock_config::MockConfig;
use helpers::mock_store::MockAddressStore;
use helpers::test_data_builder::barangay_rows;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use test_helpers::create_importer;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// 第一次清空时挂起，直到测试放行
#[derive(Default)]
struct GatedStore {
    inner: MockAddressStore,
    gated: AtomicBool,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl AddressStore for GatedStore {
    async fn delete_all(&self, table: AddressTable) -> RepositoryResult<()> {
        if !self.gated.swap(true, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.delete_all(table).await
    }

    async fn insert_many(&self, records: RecordBatch<'_>) -> RepositoryResult<usize> {
        self.inner.insert_many(records).await
    }
}

#[tokio::test]
async fn test_second_import_rejected_while_uploading() {
    logging::init_test();
    let importer = Arc::new(create_importer(GatedStore::default(), MockConfig::default()));
    let prepared = importer
        .prepare(RawTable::from_address_rows(&barangay_rows(3)))
        .unwrap();

    let background = {
        let importer = Arc::clone(&importer);
        let prepared = prepared.clone();
        tokio::spawn(async move { importer.replace_all(&prepared, CancellationToken::new()).await })
    };

    importer.store().entered.notified().await;
    assert_eq!(importer.state(), LoaderState::Uploading);

    let err = importer
        .replace_all(&prepared, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::ImportInProgress));

    // 校验同样被拒绝，且不改变进行中的状态
    assert!(matches!(
        importer.prepare(RawTable::from_address_rows(&barangay_rows(1))),
        Err(ImportError::ImportInProgress)
    ));
    assert_eq!(importer.state(), LoaderState::Uploading);

    importer.store().release.notify_one();
    let summary = background.await.unwrap().unwrap();

    assert_eq!(summary.status, LoadStatus::Success);
    // 被拒绝的调用没有产生额外的存储调用
    assert_eq!(importer.store().inner.calls().len(), 4 + 4);
    assert_eq!(importer.state(), LoaderState::Success);
}
