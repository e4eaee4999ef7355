// ==========================================
// 四级行政区划导入 - 地址领域模型
// ==========================================
// 输入: AddressRow（一行 = 一个 barangay 的完整祖先路径）
// 输出: Region / Province / Lgu / Barangay 四个实体集合
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// AddressRow - 原始输入行
// ==========================================
// 生命周期: 仅存在于单次导入过程
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRow {
    pub region_code: String,
    pub region_name: String,
    pub province_code: String,
    pub province_name: String,
    pub lgu_code: String,
    pub lgu_name: String,
    pub barangay_code: String,
    pub barangay_name: String,
}

impl AddressRow {
    /// 必填列（表头按字面、大小写敏感匹配）
    pub const REQUIRED_COLUMNS: [&'static str; 8] = [
        "regionCode",
        "regionName",
        "provinceCode",
        "provinceName",
        "lguCode",
        "lguName",
        "barangayCode",
        "barangayName",
    ];

    /// 依次返回 (列名, 值)
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("regionCode", self.region_code.as_str()),
            ("regionName", self.region_name.as_str()),
            ("provinceCode", self.province_code.as_str()),
            ("provinceName", self.province_name.as_str()),
            ("lguCode", self.lgu_code.as_str()),
            ("lguName", self.lgu_name.as_str()),
            ("barangayCode", self.barangay_code.as_str()),
            ("barangayName", self.barangay_name.as_str()),
        ]
    }
}

// ==========================================
// Region - 区域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub code: String, // 主键
    pub name: String,
}

// ==========================================
// Province - 省
// ==========================================
// region_code 不校验是否存在于 Region 集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: String,        // 主键
    pub name: String,
    pub region_code: String, // → regions.code
}

// ==========================================
// Lgu - 地方政府单位（市/镇）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lgu {
    pub code: String,          // 主键
    pub name: String,
    pub province_code: String, // → provinces.code
}

// ==========================================
// Barangay - 村
// ==========================================
// 每行一条，不按 code 去重
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barangay {
    pub code: String,
    pub name: String,
    pub province_code: String, // → provinces.code
    pub lgu_code: String,      // → lgus.code
}

// ==========================================
// HierarchyStats - 各层级数量
// ==========================================
// barangays 为原始行数，不是去重数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStats {
    pub regions: usize,
    pub provinces: usize,
    pub lgus: usize,
    pub barangays: usize,
}

// ==========================================
// AddressHierarchy - 抽取结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressHierarchy {
    pub regions: Vec<Region>,
    pub provinces: Vec<Province>,
    pub lgus: Vec<Lgu>,
    pub barangays: Vec<Barangay>,
    pub stats: HierarchyStats,
}

impl AddressHierarchy {
    pub fn is_empty(&self) -> bool {
        self.barangays.is_empty()
    }
}
