// ==========================================
// 四级行政区划导入 - 命令行入口
// ==========================================
// 子命令: validate / replace-all / set-batch-size
// 报告/汇总以 JSON 输出到 stdout，日志输出到 stderr
// replace-all 期间 Ctrl-C 触发取消（当前操作完成后停止）
// ==========================================

use address_hierarchy_loader::config::{config_keys, ConfigManager, ImportConfig, ImportConfigReader};
use address_hierarchy_loader::db::{ensure_schema, get_default_db_path, open_sqlite_connection};
use address_hierarchy_loader::importer::{HierarchyExtractorImpl, RowValidatorImpl, UniversalFileParser};
use address_hierarchy_loader::{
    logging, AddressImporter, AddressImporterImpl, LoadStatus, SqliteAddressStore, ValidationReport,
    APP_NAME, VERSION,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const DEFAULT_SHOW_ERRORS: usize = 20;

const EXIT_REJECTED: u8 = 1;
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "address-hierarchy-loader")]
#[command(about = "Validate and load a region/province/lgu/barangay address file into SQLite")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Parse and validate a file without touching any database
    Validate {
        /// Address file (.csv, .xlsx or .xls)
        file: PathBuf,

        /// Number of validation errors to print on stderr
        #[arg(long, default_value_t = DEFAULT_SHOW_ERRORS)]
        show_errors: usize,
    },

    /// Validate a file, then replace all four tables with its contents
    ReplaceAll {
        /// Address file (.csv, .xlsx or .xls)
        file: PathBuf,

        /// Barangay rows per insert batch (overrides the stored setting)
        #[arg(long, value_parser = parse_batch_size)]
        batch_size: Option<usize>,

        /// Run the whole replacement in a single transaction
        #[arg(long)]
        atomic: bool,

        /// SQLite database path (default: user data directory)
        #[arg(long)]
        db: Option<String>,

        /// Number of validation errors to print on stderr
        #[arg(long, default_value_t = DEFAULT_SHOW_ERRORS)]
        show_errors: usize,
    },

    /// Store the default barangay batch size in the config table
    SetBatchSize {
        /// Barangay rows per insert batch
        #[arg(value_parser = parse_batch_size)]
        value: usize,

        /// SQLite database path (default: user data directory)
        #[arg(long)]
        db: Option<String>,
    },
}

fn parse_batch_size(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("must be a positive integer, got '{}'", raw)),
    }
}

fn build_importer<C: ImportConfigReader>(
    store: SqliteAddressStore,
    config: C,
) -> AddressImporterImpl<SqliteAddressStore, C> {
    AddressImporterImpl::new(
        store,
        config,
        Box::new(UniversalFileParser),
        Box::new(RowValidatorImpl),
        Box::new(HierarchyExtractorImpl),
    )
}

fn print_report(report: &ValidationReport, limit: usize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);

    let (shown, hidden) = report.display_errors(limit);
    for line in shown {
        eprintln!("  {}", line);
    }
    if hidden > 0 {
        eprintln!("  ... and {} more", hidden);
    }
    Ok(())
}

fn spawn_ctrl_c_watcher(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("收到 Ctrl-C，当前操作完成后停止");
            cancel.cancel();
        }
    })
}

async fn validate(file: &Path, show_errors: usize) -> anyhow::Result<ExitCode> {
    // 校验不落盘
    let store = SqliteAddressStore::new(":memory:")?;
    let importer = build_importer(store, ImportConfig::default());

    let prepared = importer.import_file(file).await?;
    print_report(&prepared.report, show_errors)?;

    if prepared.is_ready() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_REJECTED))
    }
}

async fn load<C>(
    importer: AddressImporterImpl<SqliteAddressStore, C>,
    file: &Path,
    atomic: bool,
    show_errors: usize,
) -> anyhow::Result<ExitCode>
where
    C: ImportConfigReader + Send + Sync,
{
    let prepared = importer.import_file(file).await?;
    print_report(&prepared.report, show_errors)?;

    let cancel = CancellationToken::new();
    let watcher = spawn_ctrl_c_watcher(cancel.clone());

    let result = if atomic {
        importer.replace_all_atomic(&prepared, cancel).await
    } else {
        importer.replace_all(&prepared, cancel).await
    };
    watcher.abort();

    match result {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if summary.status == LoadStatus::Cancelled {
                Ok(ExitCode::from(EXIT_CANCELLED))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate { file, show_errors } => validate(&file, show_errors).await,
        Commands::ReplaceAll {
            file,
            batch_size,
            atomic,
            db,
            show_errors,
        } => {
            let db_path = db.unwrap_or_else(get_default_db_path);
            info!(db_path = %db_path, "使用数据库");
            let conn = open_sqlite_connection(&db_path)
                .with_context(|| format!("failed to open database {}", db_path))?;
            ensure_schema(&conn)?;
            let conn = Arc::new(Mutex::new(conn));
            let store = SqliteAddressStore::from_connection(conn.clone());

            // 命令行指定的批次大小优先于 config_kv
            match batch_size {
                Some(n) => {
                    let importer = build_importer(store, ImportConfig::with_batch_size(n));
                    load(importer, &file, atomic, show_errors).await
                }
                None => {
                    let importer = build_importer(store, ConfigManager::from_connection(conn));
                    load(importer, &file, atomic, show_errors).await
                }
            }
        }
        Commands::SetBatchSize { value, db } => {
            let db_path = db.unwrap_or_else(get_default_db_path);
            let manager = ConfigManager::new(&db_path)?;
            manager.set_config_value(config_keys::BARANGAY_BATCH_SIZE, &value.to_string())?;
            let stored = manager.get_barangay_batch_size().await?;
            info!(key = config_keys::BARANGAY_BATCH_SIZE, value = stored, "配置已保存");
            println!("{}={}", config_keys::BARANGAY_BATCH_SIZE, stored);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // 参数错误 / --help / --version 由 clap 打印并退出
    let cli = Cli::parse();

    logging::init(cli.json_log);
    info!(version = VERSION, "{} 启动", APP_NAME);

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "执行失败");
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_REJECTED)
        }
    }
}
