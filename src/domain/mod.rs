// ==========================================
// 四级行政区划导入 - 领域模型层
// ==========================================
// 职责: 定义输入行、四级实体、报告与状态类型
// 红线: 不含数据访问逻辑，不含导入流程逻辑
// ==========================================

pub mod address;
pub mod report;
pub mod types;

// 重导出核心类型
pub use address::{AddressHierarchy, AddressRow, Barangay, HierarchyStats, Lgu, Province, Region};
pub use report::{LoadSummary, ValidationReport};
pub use types::{AddressTable, LoadStatus, LoaderState};
