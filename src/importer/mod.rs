// ==========================================
// 四级行政区划导入 - 导入层
// ==========================================
// 职责: 行源解析、校验、层级抽取、写入计划、全量替换
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod address_importer_impl;
pub mod address_importer_trait;
pub mod error;
pub mod file_parser;
pub mod hierarchy_extractor;
pub mod load_planner;
pub mod row_validator;

// 重导出核心类型
pub use address_importer_impl::AddressImporterImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawTable, UniversalFileParser};
pub use hierarchy_extractor::HierarchyExtractor as HierarchyExtractorImpl;
pub use load_planner::{InsertOperation, InsertScope, LoadPlan, LoadPlanner, PlanOperation};
pub use row_validator::RowValidator as RowValidatorImpl;

// 重导出 Trait 接口
pub use address_importer_trait::{
    AddressImporter, FileParser, HierarchyExtractor, PreparedImport, RowValidator,
};
