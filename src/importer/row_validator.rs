// ==========================================
// 四级行政区划导入 - 行校验器实现
// ==========================================
// 结构校验: 必填列是否齐全（缺列即终止，不做逐行校验）
// 数据校验: 每行每个必填字段是否为空（全部收集，不短路）
// 行号: 数据行下标 + 2（表头占第 1 行，与表格软件行号一致）
// ==========================================

use crate::domain::AddressRow;
use crate::importer::address_importer_trait::RowValidator as RowValidatorTrait;
use crate::importer::file_parser::RawTable;
use std::collections::HashSet;

/// 数据行下标到表格行号的偏移
pub const ROW_NUMBER_OFFSET: usize = 2;

pub struct RowValidator;

impl RowValidator {
    /// 将原始行映射为 AddressRow（缺失单元格按空值处理）
    pub fn map_rows(table: &RawTable) -> Vec<AddressRow> {
        table
            .records
            .iter()
            .map(|record| {
                let get = |column: &str| record.get(column).cloned().unwrap_or_default();
                AddressRow {
                    region_code: get("regionCode"),
                    region_name: get("regionName"),
                    province_code: get("provinceCode"),
                    province_name: get("provinceName"),
                    lgu_code: get("lguCode"),
                    lgu_name: get("lguName"),
                    barangay_code: get("barangayCode"),
                    barangay_name: get("barangayName"),
                }
            })
            .collect()
    }

    /// 单条违规描述
    pub fn missing_value_message(row_index: usize, column: &str) -> String {
        format!(
            "Row {}: Missing value for {}",
            row_index + ROW_NUMBER_OFFSET,
            column
        )
    }
}

impl RowValidatorTrait for RowValidator {
    fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        let present: HashSet<&str> = headers.iter().map(|h| h.as_str()).collect();

        AddressRow::REQUIRED_COLUMNS
            .iter()
            .filter(|column| !present.contains(*column))
            .map(|column| column.to_string())
            .collect()
    }

    fn validate_rows(&self, rows: &[AddressRow]) -> Vec<String> {
        let mut violations = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            for (column, value) in row.fields() {
                if value.is_empty() {
                    violations.push(Self::missing_value_message(idx, column));
                }
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    fn complete_row() -> AddressRow {
        AddressRow {
            region_code: "01".to_string(),
            region_name: "R1".to_string(),
            province_code: "P1".to_string(),
            province_name: "Prov1".to_string(),
            lgu_code: "L1".to_string(),
            lgu_name: "Lgu1".to_string(),
            barangay_code: "B1".to_string(),
            barangay_name: "Brgy1".to_string(),
        }
    }

    #[test]
    fn test_all_columns_present() {
        let missing = RowValidator.missing_columns(&headers(&AddressRow::REQUIRED_COLUMNS));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_columns_reported_in_required_order() {
        let missing = RowValidator.missing_columns(&headers(&[
            "barangayName",
            "regionCode",
            "regionName",
            "provinceCode",
            "provinceName",
            "lguName",
            "extraColumn",
        ]));

        assert_eq!(missing, vec!["lguCode".to_string(), "barangayCode".to_string()]);
    }

    #[test]
    fn test_header_match_is_case_sensitive() {
        let mut columns = headers(&AddressRow::REQUIRED_COLUMNS);
        columns[4] = "LGUCODE".to_string();

        let missing = RowValidator.missing_columns(&columns);

        assert_eq!(missing, vec!["lguCode".to_string()]);
    }

    #[test]
    fn test_empty_value_uses_spreadsheet_row_number() {
        let mut row = complete_row();
        row.barangay_name.clear();

        let violations = RowValidator.validate_rows(&[row]);

        assert_eq!(violations, vec!["Row 2: Missing value for barangayName".to_string()]);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut first = complete_row();
        first.region_code.clear();
        first.lgu_name.clear();
        let mut third = complete_row();
        third.province_code.clear();

        let violations = RowValidator.validate_rows(&[first, complete_row(), third]);

        assert_eq!(
            violations,
            vec![
                "Row 2: Missing value for regionCode".to_string(),
                "Row 2: Missing value for lguName".to_string(),
                "Row 4: Missing value for provinceCode".to_string(),
            ]
        );
    }

    #[test]
    fn test_map_rows_treats_absent_cells_as_empty() {
        let mut table = RawTable::from_address_rows(&[complete_row()]);
        table.records[0].remove("lguCode");

        let rows = RowValidator::map_rows(&table);

        assert_eq!(rows[0].lgu_code, "");
        assert_eq!(rows[0].barangay_code, "B1");
    }
}
