// ==========================================
// 四级行政区划导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误文本面向最终用户，保持英文
// ==========================================

use crate::domain::AddressTable;
use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件 / 行源错误（校验前即终止，原样上报）=====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (expected .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse Excel file: {0}")]
    ExcelParseError(String),

    #[error("Failed to parse CSV file: {0}")]
    CsvParseError(String),

    // ===== 结构错误 =====
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    // ===== 写入前置条件 =====
    #[error("Import is not ready to upload: {reason}")]
    NotReady { reason: String },

    #[error("Another import is already in progress")]
    ImportInProgress,

    // ===== 存储错误（致命，已提交部分不回滚）=====
    #[error("Failed to clear {table}: {message}")]
    ClearFailed { table: AddressTable, message: String },

    #[error("Failed to insert {table} (batch {batch} of {total}): {message}")]
    InsertFailed {
        table: AddressTable,
        batch: usize,
        total: usize,
        message: String,
    },

    // ===== 数据库 / 配置错误 =====
    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    #[error("Database query failed: {0}")]
    DatabaseQueryError(String),

    #[error("Invalid config value (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 通用错误 =====
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 是否为行源（文件读取/解析）阶段的错误
    pub fn is_row_source_error(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

// 实现 From<RepositoryError>（仅用于非计划步骤的存储访问）
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => {
                ImportError::DatabaseConnectionError(msg)
            }
            other => ImportError::DatabaseQueryError(other.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_joins_all_columns() {
        let err = ImportError::MissingColumns(vec!["lguCode".to_string(), "lguName".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: lguCode, lguName");
    }

    #[test]
    fn test_store_failure_messages_name_table_and_batch() {
        let clear = ImportError::ClearFailed {
            table: AddressTable::Lgus,
            message: "disk I/O error".to_string(),
        };
        assert_eq!(clear.to_string(), "Failed to clear lgus: disk I/O error");

        let insert = ImportError::InsertFailed {
            table: AddressTable::Barangays,
            batch: 2,
            total: 3,
            message: "payload too large".to_string(),
        };
        assert_eq!(
            insert.to_string(),
            "Failed to insert barangays (batch 2 of 3): payload too large"
        );
    }
}
