// ==========================================
// 四级行政区划导入 - 校验报告与写入汇总
// ==========================================
// ValidationReport: 校验/抽取阶段输出，调用方据此决定是否写入
// LoadSummary: 写入阶段输出
// ==========================================

use crate::domain::address::HierarchyStats;
use crate::domain::types::{AddressTable, LoadStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,          // 是否可写入
    pub errors: Vec<String>,  // 违规明细（按行、按列顺序）
    pub stats: HierarchyStats, // 各层级数量
}

impl ValidationReport {
    /// 结构错误（缺列）报告，不包含任何统计
    pub fn structural_failure(message: String) -> Self {
        Self {
            valid: false,
            errors: vec![message],
            stats: HierarchyStats::default(),
        }
    }

    /// 截取前 limit 条用于展示，返回 (展示条目, 隐藏条数)
    ///
    /// 只影响展示，不修改 errors 本身。
    pub fn display_errors(&self, limit: usize) -> (&[String], usize) {
        let shown = self.errors.len().min(limit);
        (&self.errors[..shown], self.errors.len() - shown)
    }
}

// ==========================================
// LoadSummary - 写入汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub import_id: String,                // 本次导入 ID（日志关联）
    pub status: LoadStatus,               // SUCCESS / CANCELLED
    pub cleared_tables: Vec<AddressTable>, // 已清空的表（按执行顺序）
    pub inserted: HierarchyStats,         // 各表已写入行数
    pub operations_completed: usize,      // 已完成的计划操作数
    pub operations_total: usize,          // 计划操作总数
    pub atomic: bool,                     // 是否在单事务内执行
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl LoadSummary {
    pub fn is_complete(&self) -> bool {
        self.status == LoadStatus::Success && self.operations_completed == self.operations_total
    }
}
