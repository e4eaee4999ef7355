// ==========================================
// 四级行政区划导入 - 领域类型定义
// ==========================================
// 层级: region → province → lgu → barangay
// 序列化格式: 表名小写 / 状态 SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 目标表 (Address Table)
// ==========================================
// 四张固定表，顺序即父 → 子依赖顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressTable {
    Regions,
    Provinces,
    Lgus,
    Barangays,
}

impl AddressTable {
    /// 插入顺序（父表在前）
    pub const INSERT_ORDER: [AddressTable; 4] = [
        AddressTable::Regions,
        AddressTable::Provinces,
        AddressTable::Lgus,
        AddressTable::Barangays,
    ];

    /// 删除顺序（子表在前，满足外键约束）
    pub const DELETE_ORDER: [AddressTable; 4] = [
        AddressTable::Barangays,
        AddressTable::Lgus,
        AddressTable::Provinces,
        AddressTable::Regions,
    ];

    /// 数据库表名
    pub fn table_name(&self) -> &'static str {
        match self {
            AddressTable::Regions => "regions",
            AddressTable::Provinces => "provinces",
            AddressTable::Lgus => "lgus",
            AddressTable::Barangays => "barangays",
        }
    }
}

impl fmt::Display for AddressTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

// ==========================================
// 导入器状态 (Loader State)
// ==========================================
// idle → validating → (error | uploading) → (success | error | cancelled)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "state", content = "message")]
pub enum LoaderState {
    Idle,          // 空闲
    Validating,    // 校验中
    Uploading,     // 写入中
    Success,       // 全量替换完成
    Error(String), // 失败（附错误信息）
    Cancelled,     // 调用方取消
}

impl fmt::Display for LoaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderState::Idle => write!(f, "IDLE"),
            LoaderState::Validating => write!(f, "VALIDATING"),
            LoaderState::Uploading => write!(f, "UPLOADING"),
            LoaderState::Success => write!(f, "SUCCESS"),
            LoaderState::Error(msg) => write!(f, "ERROR: {}", msg),
            LoaderState::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

// ==========================================
// 写入终态 (Load Status)
// ==========================================
// 错误终态通过 Err(ImportError) 返回，这里只区分完成与取消
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Success,
    Cancelled,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Success => write!(f, "SUCCESS"),
            LoadStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_order_is_reverse_of_insert_order() {
        let mut reversed = AddressTable::INSERT_ORDER;
        reversed.reverse();
        assert_eq!(reversed, AddressTable::DELETE_ORDER);
    }

    #[test]
    fn test_loader_state_serialization() {
        let json = serde_json::to_string(&LoaderState::Error("boom".to_string())).unwrap();
        assert_eq!(json, r#"{"state":"ERROR","message":"boom"}"#);
        assert_eq!(AddressTable::Lgus.to_string(), "lgus");
    }
}
