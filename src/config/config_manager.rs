// ==========================================
// 四级行政区划导入 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取导入配置，缺省时回退默认值
// 存储: config_kv 表 (scope_id + key → value)
// ==========================================

use crate::config::import_config_trait::{ImportConfigReader, DEFAULT_BARANGAY_BATCH_SIZE};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 配置键
pub mod config_keys {
    pub const BARANGAY_BATCH_SIZE: &str = "import/barangay_batch_size";
}

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("failed to acquire config lock: {}", e)))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 配置（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("failed to acquire config lock: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;

        Ok(())
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_barangay_batch_size(&self) -> ImportResult<usize> {
        let key = config_keys::BARANGAY_BATCH_SIZE;
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => {
                debug!(key = key, default = DEFAULT_BARANGAY_BATCH_SIZE, "配置缺失，使用默认值");
                return Ok(DEFAULT_BARANGAY_BATCH_SIZE);
            }
        };

        match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "batch size must be a positive integer".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_manager() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, manager)
    }

    #[tokio::test]
    async fn test_batch_size_defaults_when_missing() {
        let (_temp_file, manager) = create_manager();

        let size = manager.get_barangay_batch_size().await.unwrap();

        assert_eq!(size, DEFAULT_BARANGAY_BATCH_SIZE);
    }

    #[tokio::test]
    async fn test_batch_size_reads_stored_value() {
        let (_temp_file, manager) = create_manager();
        manager
            .set_config_value(config_keys::BARANGAY_BATCH_SIZE, "250")
            .unwrap();

        assert_eq!(manager.get_barangay_batch_size().await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_batch_size_rejects_zero_and_garbage() {
        let (_temp_file, manager) = create_manager();

        manager
            .set_config_value(config_keys::BARANGAY_BATCH_SIZE, "0")
            .unwrap();
        assert!(matches!(
            manager.get_barangay_batch_size().await,
            Err(ImportError::ConfigValueError { .. })
        ));

        manager
            .set_config_value(config_keys::BARANGAY_BATCH_SIZE, "abc")
            .unwrap();
        assert!(manager.get_barangay_batch_size().await.is_err());
    }
}
