// ==========================================
// 四级行政区划导入 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// 流程: 行源 → 行校验 → 层级抽取 → 写入计划 → 全量替换
// ==========================================

use crate::domain::{AddressHierarchy, AddressRow, LoadSummary, LoaderState, ValidationReport};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawTable;
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;

// ==========================================
// PreparedImport - 已校验、已抽取的导入
// ==========================================
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub report: ValidationReport,     // 校验报告（含统计）
    pub hierarchy: AddressHierarchy,  // 抽取结果（结构错误时为空）
    pub row_count: usize,             // 输入行数
}

impl PreparedImport {
    /// 是否满足写入条件：校验通过且至少一行
    pub fn is_ready(&self) -> bool {
        self.report.valid && self.row_count > 0
    }
}

// ==========================================
// AddressImporter Trait
// ==========================================
// 用途: 地址导入主接口
// 实现者: AddressImporterImpl
#[async_trait]
pub trait AddressImporter: Send + Sync {
    /// 解析文件并完成校验 + 抽取
    ///
    /// # 返回
    /// - Ok(PreparedImport): 校验报告（结构/数据错误以报告形式返回）
    /// - Err: 行源错误（文件不存在、格式不支持、解析失败）
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<PreparedImport>;

    /// 对已解码的行执行校验 + 抽取（纯计算，不访问存储）
    fn prepare(&self, table: RawTable) -> ImportResult<PreparedImport>;

    /// 全量替换四张表（破坏性操作，需显式调用）
    ///
    /// # 流程
    /// 1. 前置条件：report.valid 且行数 > 0，否则不访问存储直接拒绝
    /// 2. 依次清空 barangays → lgus → provinces → regions
    /// 3. 依次写入 regions → provinces → lgus → barangays（分批）
    /// 4. 每个操作之间检查取消信号
    ///
    /// # 返回
    /// - Ok(LoadSummary): SUCCESS 或 CANCELLED
    /// - Err: 前置条件不满足 / 存储失败（已提交部分不回滚）
    async fn replace_all(
        &self,
        prepared: &PreparedImport,
        cancel: CancellationToken,
    ) -> ImportResult<LoadSummary>;

    /// 当前状态
    fn state(&self) -> LoaderState;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 行源接口
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 结构完整性 + 逐行数据完整性校验
// 实现者: RowValidatorImpl
pub trait RowValidator: Send + Sync {
    /// 返回缺失的必填列（按必填列顺序）
    fn missing_columns(&self, headers: &[String]) -> Vec<String>;

    /// 校验所有行的所有必填字段，返回全部违规描述（不短路）
    fn validate_rows(&self, rows: &[AddressRow]) -> Vec<String>;
}

// ==========================================
// HierarchyExtractor Trait
// ==========================================
// 用途: 去重抽取四级实体
// 实现者: HierarchyExtractorImpl
pub trait HierarchyExtractor: Send + Sync {
    /// region/province/lgu 按 code 去重（首次出现为准），barangay 逐行保留
    fn extract(&self, rows: &[AddressRow]) -> AddressHierarchy;
}
