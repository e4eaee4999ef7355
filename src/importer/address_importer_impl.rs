// ==========================================
// 四级行政区划导入 - 导入器实现
// ==========================================
// 职责: 整合导入流程，从行源到全量替换
// 流程: 解析 → 结构校验 → 行校验 → 层级抽取 → 写入计划 → 清空 → 写入
// 状态: idle → validating → (error | idle) → uploading → (success | error | cancelled)
// ==========================================
// 一致性说明:
// - replace_all 逐个提交，中途失败不回滚，需重新执行完整导入
// - replace_all_atomic 要求存储支持单事务，失败时原数据保持不变
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{AddressTable, HierarchyStats, LoadStatus, LoadSummary, LoaderState, ValidationReport};
use crate::importer::address_importer_trait::{
    AddressImporter, FileParser, HierarchyExtractor, PreparedImport, RowValidator,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawTable;
use crate::importer::load_planner::{InsertOperation, LoadPlan, LoadPlanner, PlanOperation};
use crate::importer::row_validator::RowValidator as RowMapper;
use crate::repository::{AddressStore, StoreStep, TransactionalAddressStore};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// 运行中标记（同一导入器不允许并发导入）
// ==========================================
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> ImportResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ImportError::ImportInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ==========================================
// 写入进度
// ==========================================
struct LoadProgress {
    import_id: String,
    started_at: DateTime<Utc>,
    clock: Instant,
    cleared_tables: Vec<AddressTable>,
    inserted: HierarchyStats,
    completed: usize,
    total: usize,
}

impl LoadProgress {
    fn new(total: usize) -> Self {
        Self {
            import_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            clock: Instant::now(),
            cleared_tables: Vec::new(),
            inserted: HierarchyStats::default(),
            completed: 0,
            total,
        }
    }

    fn record_insert(&mut self, table: AddressTable, rows: usize) {
        match table {
            AddressTable::Regions => self.inserted.regions += rows,
            AddressTable::Provinces => self.inserted.provinces += rows,
            AddressTable::Lgus => self.inserted.lgus += rows,
            AddressTable::Barangays => self.inserted.barangays += rows,
        }
    }

    fn finish(self, status: LoadStatus, atomic: bool) -> LoadSummary {
        LoadSummary {
            import_id: self.import_id,
            status,
            cleared_tables: self.cleared_tables,
            inserted: self.inserted,
            operations_completed: self.completed,
            operations_total: self.total,
            atomic,
            started_at: self.started_at,
            finished_at: Utc::now(),
            elapsed_ms: self.clock.elapsed().as_millis() as u64,
        }
    }
}

// ==========================================
// AddressImporterImpl - 导入器实现
// ==========================================
pub struct AddressImporterImpl<R, C>
where
    R: AddressStore,
    C: ImportConfigReader,
{
    // 数据访问层
    store: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    row_validator: Box<dyn RowValidator>,
    hierarchy_extractor: Box<dyn HierarchyExtractor>,

    // 状态机
    state: Mutex<LoaderState>,
    in_flight: AtomicBool,
}

impl<R, C> AddressImporterImpl<R, C>
where
    R: AddressStore,
    C: ImportConfigReader,
{
    /// 创建新的导入器实例
    pub fn new(
        store: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        row_validator: Box<dyn RowValidator>,
        hierarchy_extractor: Box<dyn HierarchyExtractor>,
    ) -> Self {
        Self {
            store,
            config,
            file_parser,
            row_validator,
            hierarchy_extractor,
            state: Mutex::new(LoaderState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// 存储访问（供调用方核对写入结果）
    pub fn store(&self) -> &R {
        &self.store
    }

    fn set_state(&self, next: LoaderState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        debug!(from = %*state, to = %next, "状态切换");
        *state = next;
    }

    /// 校验 + 抽取（不加运行中标记，由调用方负责）
    fn validate_and_extract(&self, table: RawTable) -> PreparedImport {
        self.set_state(LoaderState::Validating);
        let row_count = table.row_count();

        // 结构校验：缺列即终止
        let missing = self.row_validator.missing_columns(&table.headers);
        if !missing.is_empty() {
            let err = ImportError::MissingColumns(missing);
            warn!(error = %err, "结构校验失败");
            self.set_state(LoaderState::Error(err.to_string()));
            return PreparedImport {
                report: ValidationReport::structural_failure(err.to_string()),
                hierarchy: Default::default(),
                row_count,
            };
        }

        // 逐行校验（全部收集）
        let rows = RowMapper::map_rows(&table);
        let errors = self.row_validator.validate_rows(&rows);

        // 层级抽取（行级错误不阻断抽取）
        let hierarchy = self.hierarchy_extractor.extract(&rows);

        let report = ValidationReport {
            valid: errors.is_empty(),
            errors,
            stats: hierarchy.stats,
        };

        if report.valid {
            info!(
                rows = row_count,
                regions = report.stats.regions,
                provinces = report.stats.provinces,
                lgus = report.stats.lgus,
                barangays = report.stats.barangays,
                "校验通过"
            );
            self.set_state(LoaderState::Idle);
        } else {
            warn!(violations = report.errors.len(), "行校验失败");
            self.set_state(LoaderState::Error(format!(
                "{} validation error(s)",
                report.errors.len()
            )));
        }

        PreparedImport {
            report,
            hierarchy,
            row_count,
        }
    }

    /// 写入前置条件 + 计划生成
    async fn plan_for(&self, prepared: &PreparedImport) -> ImportResult<LoadPlan> {
        if !prepared.report.valid {
            return Err(ImportError::NotReady {
                reason: format!(
                    "validation report has {} error(s)",
                    prepared.report.errors.len()
                ),
            });
        }
        if prepared.row_count == 0 {
            return Err(ImportError::NotReady {
                reason: "no rows to upload".to_string(),
            });
        }

        let planner = LoadPlanner::new(self.config.get_barangay_batch_size().await?);
        let plan = planner.plan(&prepared.hierarchy);
        debug!(batch_size = planner.batch_size(), operations = plan.len(), "写入计划已生成");
        Ok(plan)
    }

    fn fail(&self, err: ImportError) -> ImportError {
        error!(error = %err, "全量替换失败");
        self.set_state(LoaderState::Error(err.to_string()));
        err
    }

    fn cancelled(&self, progress: LoadProgress, atomic: bool) -> LoadSummary {
        warn!(
            completed = progress.completed,
            total = progress.total,
            "全量替换已取消"
        );
        self.set_state(LoaderState::Cancelled);
        progress.finish(LoadStatus::Cancelled, atomic)
    }
}

/// 存储失败 → 带表名/批次的导入错误
fn step_error(operation: &PlanOperation, message: String) -> ImportError {
    match operation {
        PlanOperation::Delete { table } => ImportError::ClearFailed {
            table: *table,
            message,
        },
        PlanOperation::Insert(op) => insert_error(op, message),
    }
}

fn insert_error(op: &InsertOperation, message: String) -> ImportError {
    let (batch, total) = op.scope.position();
    ImportError::InsertFailed {
        table: op.table,
        batch,
        total,
        message,
    }
}

#[async_trait::async_trait]
impl<R, C> AddressImporter for AddressImporterImpl<R, C>
where
    R: AddressStore + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path))]
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<PreparedImport> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始解析文件");

        let table = self.file_parser.parse_to_raw_table(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            self.set_state(LoaderState::Error(e.to_string()));
            e
        })?;
        info!(rows = table.row_count(), columns = table.headers.len(), "文件解析完成");

        Ok(self.validate_and_extract(table))
    }

    fn prepare(&self, table: RawTable) -> ImportResult<PreparedImport> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;
        Ok(self.validate_and_extract(table))
    }

    #[instrument(skip(self, prepared, cancel), fields(import_id))]
    async fn replace_all(
        &self,
        prepared: &PreparedImport,
        cancel: CancellationToken,
    ) -> ImportResult<LoadSummary> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let plan = match self.plan_for(prepared).await {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e)),
        };

        let operations = plan.operations();
        let steps = plan.steps(&prepared.hierarchy);
        let mut progress = LoadProgress::new(operations.len());
        tracing::Span::current().record("import_id", progress.import_id.as_str());

        self.set_state(LoaderState::Uploading);
        info!(operations = progress.total, "开始全量替换");

        for (operation, step) in operations.iter().zip(steps.iter()) {
            // 取消信号只在操作之间检查
            if cancel.is_cancelled() {
                return Ok(self.cancelled(progress, false));
            }

            match step {
                StoreStep::Delete(table) => {
                    if let Err(e) = self.store.delete_all(*table).await {
                        return Err(self.fail(step_error(operation, e.to_string())));
                    }
                    debug!(table = %table, "表已清空");
                    progress.cleared_tables.push(*table);
                }
                StoreStep::Insert(records) => {
                    let table = records.table();
                    match self.store.insert_many(*records).await {
                        Ok(rows) => {
                            if let PlanOperation::Insert(op) = operation {
                                debug!(operation = %op, rows = rows, "写入完成");
                            }
                            progress.record_insert(table, rows);
                        }
                        Err(e) => return Err(self.fail(step_error(operation, e.to_string()))),
                    }
                }
            }
            progress.completed += 1;
        }

        self.set_state(LoaderState::Success);
        let summary = progress.finish(LoadStatus::Success, false);
        info!(
            import_id = %summary.import_id,
            regions = summary.inserted.regions,
            provinces = summary.inserted.provinces,
            lgus = summary.inserted.lgus,
            barangays = summary.inserted.barangays,
            elapsed_ms = summary.elapsed_ms,
            "全量替换完成"
        );
        Ok(summary)
    }

    fn state(&self) -> LoaderState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

// ==========================================
// 单事务全量替换（存储支持事务时可用）
// ==========================================
impl<R, C> AddressImporterImpl<R, C>
where
    R: TransactionalAddressStore,
    C: ImportConfigReader,
{
    /// 在一个事务内执行完整计划，任一步失败则原数据保持不变
    ///
    /// 取消信号只在事务开始前检查一次。
    #[instrument(skip(self, prepared, cancel), fields(import_id))]
    pub async fn replace_all_atomic(
        &self,
        prepared: &PreparedImport,
        cancel: CancellationToken,
    ) -> ImportResult<LoadSummary> {
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let plan = match self.plan_for(prepared).await {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(e)),
        };

        let operations = plan.operations();
        let steps = plan.steps(&prepared.hierarchy);
        let mut progress = LoadProgress::new(operations.len());
        tracing::Span::current().record("import_id", progress.import_id.as_str());

        if cancel.is_cancelled() {
            return Ok(self.cancelled(progress, true));
        }

        self.set_state(LoaderState::Uploading);
        info!(operations = progress.total, "开始单事务全量替换");

        if let Err(failure) = self.store.replace_all_atomic(&steps).await {
            let message = failure.error.to_string();
            let err = match operations.get(failure.step) {
                Some(operation) => step_error(operation, message),
                None => ImportError::DatabaseQueryError(message),
            };
            return Err(self.fail(err));
        }

        for step in &steps {
            match step {
                StoreStep::Delete(table) => progress.cleared_tables.push(*table),
                StoreStep::Insert(records) => progress.record_insert(records.table(), records.len()),
            }
        }
        progress.completed = progress.total;

        self.set_state(LoaderState::Success);
        let summary = progress.finish(LoadStatus::Success, true);
        info!(
            import_id = %summary.import_id,
            barangays = summary.inserted.barangays,
            elapsed_ms = summary.elapsed_ms,
            "单事务全量替换完成"
        );
        Ok(summary)
    }
}
