// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use address_hierarchy_loader::importer::RawTable;
use address_hierarchy_loader::AddressRow;
use std::collections::HashMap;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

// ==========================================
// AddressRow 构建器
// ==========================================

pub struct RowBuilder {
    row: AddressRow,
}

impl RowBuilder {
    /// 以 barangay code 为种子，上级默认为 01/P1/L1
    pub fn new(barangay_code: &str) -> Self {
        Self {
            row: AddressRow {
                region_code: "01".to_string(),
                region_name: "R1".to_string(),
                province_code: "P1".to_string(),
                province_name: "Prov1".to_string(),
                lgu_code: "L1".to_string(),
                lgu_name: "Lgu1".to_string(),
                barangay_code: barangay_code.to_string(),
                barangay_name: format!("Brgy {}", barangay_code),
            },
        }
    }

    pub fn region(mut self, code: &str, name: &str) -> Self {
        self.row.region_code = code.to_string();
        self.row.region_name = name.to_string();
        self
    }

    pub fn province(mut self, code: &str, name: &str) -> Self {
        self.row.province_code = code.to_string();
        self.row.province_name = name.to_string();
        self
    }

    pub fn lgu(mut self, code: &str, name: &str) -> Self {
        self.row.lgu_code = code.to_string();
        self.row.lgu_name = name.to_string();
        self
    }

    pub fn barangay_name(mut self, name: &str) -> Self {
        self.row.barangay_name = name.to_string();
        self
    }

    pub fn build(self) -> AddressRow {
        self.row
    }
}

/// n 行，同一 region/province/lgu，barangay code 为 B00001..
pub fn barangay_rows(n: usize) -> Vec<AddressRow> {
    (1..=n)
        .map(|i| RowBuilder::new(&format!("B{:05}", i)).build())
        .collect()
}

/// 按给定表头构造 RawTable（缺失的列不写入记录）
pub fn raw_table_with_headers(headers: &[&str], rows: &[AddressRow]) -> RawTable {
    let records = rows
        .iter()
        .map(|row| {
            row.fields()
                .iter()
                .filter(|(column, _)| headers.contains(column))
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>()
        })
        .collect();

    RawTable::from_rows(headers.iter().map(|h| h.to_string()).collect(), records)
}

/// 写出完整 8 列的 CSV 临时文件
pub fn write_csv(rows: &[AddressRow]) -> NamedTempFile {
    let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(temp_file, "{}", AddressRow::REQUIRED_COLUMNS.join(",")).unwrap();
    for row in rows {
        let values: Vec<&str> = row.fields().iter().map(|(_, value)| *value).collect();
        writeln!(temp_file, "{}", values.join(",")).unwrap();
    }
    temp_file.flush().unwrap();
    temp_file
}
