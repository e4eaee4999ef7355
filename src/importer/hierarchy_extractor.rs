// ==========================================
// 四级行政区划导入 - 层级抽取器实现
// ==========================================
// 规则:
// - region / province / lgu: 按 code 去重，首次出现的行决定 name 与父级 code
//   后续同 code 行即使 name/父级不同也直接忽略（不合并、不报警）
// - barangay: 每行一条，不去重；统计值 = 输入行数
// - 输出顺序 = 首次出现顺序
// ==========================================

use crate::domain::{AddressHierarchy, AddressRow, Barangay, HierarchyStats, Lgu, Province, Region};
use crate::importer::address_importer_trait::HierarchyExtractor as HierarchyExtractorTrait;
use std::collections::HashMap;

// ==========================================
// FirstSeen - 插入有序、首次写入为准的映射
// ==========================================
struct FirstSeen<T> {
    index: HashMap<String, usize>,
    items: Vec<T>,
}

impl<T> FirstSeen<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }

    /// code 首次出现时才构造并保存值
    fn insert_with(&mut self, code: &str, make: impl FnOnce() -> T) {
        if self.index.contains_key(code) {
            return;
        }
        self.index.insert(code.to_string(), self.items.len());
        self.items.push(make());
    }

    fn into_vec(self) -> Vec<T> {
        self.items
    }
}

pub struct HierarchyExtractor;

impl HierarchyExtractorTrait for HierarchyExtractor {
    fn extract(&self, rows: &[AddressRow]) -> AddressHierarchy {
        let mut regions = FirstSeen::new();
        let mut provinces = FirstSeen::new();
        let mut lgus = FirstSeen::new();
        let mut barangays = Vec::with_capacity(rows.len());

        for row in rows {
            regions.insert_with(&row.region_code, || Region {
                code: row.region_code.clone(),
                name: row.region_name.clone(),
            });

            provinces.insert_with(&row.province_code, || Province {
                code: row.province_code.clone(),
                name: row.province_name.clone(),
                region_code: row.region_code.clone(),
            });

            lgus.insert_with(&row.lgu_code, || Lgu {
                code: row.lgu_code.clone(),
                name: row.lgu_name.clone(),
                province_code: row.province_code.clone(),
            });

            barangays.push(Barangay {
                code: row.barangay_code.clone(),
                name: row.barangay_name.clone(),
                province_code: row.province_code.clone(),
                lgu_code: row.lgu_code.clone(),
            });
        }

        let regions = regions.into_vec();
        let provinces = provinces.into_vec();
        let lgus = lgus.into_vec();

        let stats = HierarchyStats {
            regions: regions.len(),
            provinces: provinces.len(),
            lgus: lgus.len(),
            barangays: rows.len(),
        };

        AddressHierarchy {
            regions,
            provinces,
            lgus,
            barangays,
            stats,
        }
    }
}
