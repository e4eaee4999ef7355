// ==========================================
// 四级行政区划导入 - 写入计划
// ==========================================
// 删除顺序: barangays → lgus → provinces → regions（子表在前）
// 写入顺序: regions → provinces → lgus → barangays（父表在前）
// 分批: 仅 barangays 按固定批次大小切分，其余表整体写入
// ==========================================

use crate::domain::{AddressHierarchy, AddressTable};
use crate::repository::{RecordBatch, StoreStep};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

// ==========================================
// InsertScope - 写入范围
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum InsertScope {
    Whole,                              // 整个集合
    Batch { index: usize, count: usize }, // 第 index 批（0 起），共 count 批
}

impl InsertScope {
    /// 1 起的批次号与批次总数（整体写入视为 1/1）
    pub fn position(&self) -> (usize, usize) {
        match self {
            InsertScope::Whole => (1, 1),
            InsertScope::Batch { index, count } => (index + 1, *count),
        }
    }
}

// ==========================================
// InsertOperation - 单次写入
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertOperation {
    pub table: AddressTable,
    pub scope: InsertScope,
    pub range: Range<usize>, // 在对应集合中的下标范围
}

impl InsertOperation {
    /// 从抽取结果中借出本次写入的记录
    pub fn records<'a>(&self, hierarchy: &'a AddressHierarchy) -> RecordBatch<'a> {
        let range = self.range.clone();
        match self.table {
            AddressTable::Regions => RecordBatch::Regions(&hierarchy.regions[range]),
            AddressTable::Provinces => RecordBatch::Provinces(&hierarchy.provinces[range]),
            AddressTable::Lgus => RecordBatch::Lgus(&hierarchy.lgus[range]),
            AddressTable::Barangays => RecordBatch::Barangays(&hierarchy.barangays[range]),
        }
    }
}

impl fmt::Display for InsertOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            InsertScope::Whole => write!(f, "insert {} ({} rows)", self.table, self.range.len()),
            InsertScope::Batch { index, count } => write!(
                f,
                "insert {} batch {}/{} ({} rows)",
                self.table,
                index + 1,
                count,
                self.range.len()
            ),
        }
    }
}

// ==========================================
// PlanOperation - 计划中的单个操作
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "op")]
pub enum PlanOperation {
    Delete { table: AddressTable },
    Insert(InsertOperation),
}

// ==========================================
// LoadPlan - 写入计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadPlan {
    pub deletes: Vec<AddressTable>,
    pub inserts: Vec<InsertOperation>,
}

impl LoadPlan {
    /// 全部操作：先删除、后写入
    pub fn operations(&self) -> Vec<PlanOperation> {
        self.deletes
            .iter()
            .map(|table| PlanOperation::Delete { table: *table })
            .chain(self.inserts.iter().cloned().map(PlanOperation::Insert))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.deletes.len() + self.inserts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 把计划展开为存储步骤（与 operations() 一一对应）
    pub fn steps<'a>(&self, hierarchy: &'a AddressHierarchy) -> Vec<StoreStep<'a>> {
        self.deletes
            .iter()
            .map(|table| StoreStep::Delete(*table))
            .chain(
                self.inserts
                    .iter()
                    .map(|op| StoreStep::Insert(op.records(hierarchy))),
            )
            .collect()
    }
}

// ==========================================
// LoadPlanner - 计划生成器
// ==========================================
pub struct LoadPlanner {
    batch_size: usize,
}

impl LoadPlanner {
    /// # 参数
    /// - batch_size: barangay 批次大小（调用方保证 > 0）
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn plan(&self, hierarchy: &AddressHierarchy) -> LoadPlan {
        let deletes = AddressTable::DELETE_ORDER.to_vec();

        let mut inserts = Vec::new();
        for table in AddressTable::INSERT_ORDER {
            match table {
                AddressTable::Barangays => {
                    inserts.extend(self.barangay_batches(hierarchy.barangays.len()));
                }
                _ => {
                    let len = match table {
                        AddressTable::Regions => hierarchy.regions.len(),
                        AddressTable::Provinces => hierarchy.provinces.len(),
                        _ => hierarchy.lgus.len(),
                    };
                    inserts.push(InsertOperation {
                        table,
                        scope: InsertScope::Whole,
                        range: 0..len,
                    });
                }
            }
        }

        LoadPlan { deletes, inserts }
    }

    /// ceil(total / batch_size) 个连续批次
    fn barangay_batches(&self, total: usize) -> Vec<InsertOperation> {
        let count = total.div_ceil(self.batch_size);
        (0..count)
            .map(|index| {
                let start = index * self.batch_size;
                let end = (start + self.batch_size).min(total);
                InsertOperation {
                    table: AddressTable::Barangays,
                    scope: InsertScope::Batch { index, count },
                    range: start..end,
                }
            })
            .collect()
    }
}
