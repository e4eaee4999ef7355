// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use address_hierarchy_loader::config::{ImportConfigReader, DEFAULT_BARANGAY_BATCH_SIZE};
use address_hierarchy_loader::importer::{ImportError, ImportResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock 配置结构（记录读取次数）
#[derive(Debug)]
pub struct MockConfig {
    pub barangay_batch_size: usize,
    reads: AtomicUsize,
}

impl MockConfig {
    pub fn new(barangay_batch_size: usize) -> Self {
        Self {
            barangay_batch_size,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BARANGAY_BATCH_SIZE)
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_barangay_batch_size(&self) -> ImportResult<usize> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.barangay_batch_size == 0 {
            return Err(ImportError::ConfigValueError {
                key: "import/barangay_batch_size".to_string(),
                value: "0".to_string(),
                message: "batch size must be greater than 0".to_string(),
            });
        }
        Ok(self.barangay_batch_size)
    }
}
