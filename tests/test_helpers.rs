// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、导入器组装等功能
// ==========================================

#![allow(dead_code)]

use address_hierarchy_loader::config::ImportConfigReader;
use address_hierarchy_loader::db::{ensure_schema, open_sqlite_connection};
use address_hierarchy_loader::importer::{
    HierarchyExtractorImpl, RowValidatorImpl, UniversalFileParser,
};
use address_hierarchy_loader::repository::AddressStore;
use address_hierarchy_loader::AddressImporterImpl;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（store 与 ConfigManager 共用）
pub fn shared_connection(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).unwrap();
    Arc::new(Mutex::new(conn))
}

/// 组装导入器（标准组件）
pub fn create_importer<R, C>(store: R, config: C) -> AddressImporterImpl<R, C>
where
    R: AddressStore,
    C: ImportConfigReader,
{
    AddressImporterImpl::new(
        store,
        config,
        Box::new(UniversalFileParser),
        Box::new(RowValidatorImpl),
        Box::new(HierarchyExtractorImpl),
    )
}
