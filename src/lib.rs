// ==========================================
// 四级行政区划导入 - 核心库
// ==========================================
// 层级: region → province → lgu → barangay
// 技术栈: Rust + SQLite
// 定位: 扁平表格 → 去重后的四级实体 → 按依赖顺序全量替换
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 校验 / 抽取 / 写入
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AddressHierarchy, AddressRow, AddressTable, Barangay, HierarchyStats, LoadStatus, LoadSummary,
    LoaderState, Lgu, Province, Region, ValidationReport,
};

// 导入器
pub use importer::{AddressImporter, AddressImporterImpl, ImportError, ImportResult, PreparedImport};

// 存储
pub use repository::{AddressStore, SqliteAddressStore, TransactionalAddressStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "address-hierarchy-loader";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
