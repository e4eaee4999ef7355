// ==========================================
// 四级行政区划导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// barangay 批量写入的默认批次大小
pub const DEFAULT_BARANGAY_BATCH_SIZE: usize = 1000;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）、ImportConfig（静态值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取 barangay 批次大小
    ///
    /// # 默认值
    /// - 1000
    ///
    /// # 约束
    /// - 必须 > 0，否则返回 ImportError::ConfigValueError
    async fn get_barangay_batch_size(&self) -> ImportResult<usize>;
}

// ==========================================
// ImportConfig - 静态配置快照
// ==========================================
// 用途: CLI 参数覆写 / 测试
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub barangay_batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            barangay_batch_size: DEFAULT_BARANGAY_BATCH_SIZE,
        }
    }
}

impl ImportConfig {
    pub fn with_batch_size(barangay_batch_size: usize) -> Self {
        Self { barangay_batch_size }
    }
}

#[async_trait]
impl ImportConfigReader for ImportConfig {
    async fn get_barangay_batch_size(&self) -> ImportResult<usize> {
        if self.barangay_batch_size == 0 {
            return Err(ImportError::ConfigValueError {
                key: "barangay_batch_size".to_string(),
                value: "0".to_string(),
                message: "batch size must be greater than 0".to_string(),
            });
        }
        Ok(self.barangay_batch_size)
    }
}
