// ==========================================
// 四级行政区划导入 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口，屏蔽数据库细节
// 约束: 所有取值使用参数化，表名只来自固定枚举
// ==========================================

pub mod address_repo;
pub mod address_repo_impl;
pub mod error;

// 重导出核心仓储
pub use address_repo::{
    AddressStore, RecordBatch, StepFailure, StoreStep, TransactionalAddressStore,
};
pub use address_repo_impl::SqliteAddressStore;
pub use error::{RepositoryError, RepositoryResult};
