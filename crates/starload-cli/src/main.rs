mod config;
mod registry;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use config::{ConfigError, DatabaseConfig, StarloadConfig};
use registry::{
    init_run_logging, init_stderr_logging, start_run, write_report, RunContext, RunPaths,
    RunReport, RunStatus,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use starload_clean::output::write_batch_csv;
use starload_clean::{clean, CleanError, CleanReport};
use starload_core::{Batch, Entity, Error as CoreError};
use starload_extract::{
    parse_csv_batch, parse_json_batch, DataExtractor, ExtractError, Extractor, HttpSource,
    PostgresSource,
};
use starload_load::PostgresLoader;
use starload_pipeline::{
    extract_and_clean, load_order, PipelineError, StarSchemaService, TableOutcome,
};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("extract error: {0}")]
    Extract(#[from] ExtractError),
    #[error("clean error: {0}")]
    Clean(#[from] CleanError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Parser, Debug)]
#[command(name = "starload", version, about = "Load retail sales data into a star-schema warehouse")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, clean and load one warehouse table, or all of them.
    Load(LoadArgs),
    /// Clean a local JSON, CSV or PDF extract into a CSV file.
    Clean(CleanArgs),
    /// List the tables of the legacy source database.
    ListTables(ListTablesArgs),
}

#[derive(Debug, Clone, Copy)]
enum Target {
    All,
    One(Entity),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("all"),
            Target::One(entity) => write!(f, "{entity}"),
        }
    }
}

fn parse_target(value: &str) -> Result<Target, CoreError> {
    if value == "all" {
        return Ok(Target::All);
    }
    Entity::from_str(value).map(Target::One)
}

#[derive(Args, Debug)]
struct LoadArgs {
    /// users, cards, stores, products, orders, date-times or all.
    #[arg(value_parser = parse_target)]
    target: Target,
    /// Configuration file.
    #[arg(long, default_value = "starload.toml")]
    config: PathBuf,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Extract and clean only; write the cleaned CSVs into the run directory.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct CleanArgs {
    #[arg(value_parser = Entity::from_str)]
    entity: Entity,
    /// Raw extract (.json, .csv or .pdf).
    #[arg(long)]
    input: PathBuf,
    /// Cleaned CSV output.
    #[arg(long)]
    out: PathBuf,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ListTablesArgs {
    /// Configuration file.
    #[arg(long, default_value = "starload.toml")]
    config: PathBuf,
}

/// What a run produced, written to `report.json`.
#[derive(Default)]
struct RunResults {
    tables: Vec<TableOutcome>,
    cleaned: Vec<CleanReport>,
    outputs: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Load(args) => run_load(args).await,
        Command::Clean(args) => run_clean(args),
        Command::ListTables(args) => run_list_tables(args).await,
    }
}

fn begin_run(
    command: String,
    dry_run: bool,
    run_dir: PathBuf,
    config: Option<&StarloadConfig>,
) -> Result<(RunContext, RunPaths), CliError> {
    let ctx = RunContext {
        run_id: Uuid::new_v4().to_string(),
        started_at: chrono::Utc::now(),
        command,
        dry_run,
        run_dir,
        config: config.map(StarloadConfig::redacted),
    };
    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;
    info!(
        event = "run_started",
        run_id = %ctx.run_id,
        command = %ctx.command,
        dry_run,
        "run started"
    );
    Ok((ctx, paths))
}

fn finish_run(
    ctx: &RunContext,
    paths: &RunPaths,
    timer: Instant,
    result: Result<RunResults, CliError>,
) -> Result<(), CliError> {
    let duration_ms = timer.elapsed().as_millis() as u64;
    let (status, error, results) = match result {
        Ok(results) => (RunStatus::Success, None, Ok(results)),
        Err(err) => (RunStatus::Failed, Some(err.to_string()), Err(err)),
    };
    let empty = RunResults::default();
    let recorded = results.as_ref().unwrap_or(&empty);

    write_report(
        paths,
        &RunReport {
            run_id: ctx.run_id.clone(),
            status,
            error: error.clone(),
            duration_ms,
            tables: recorded.tables.clone(),
            cleaned: recorded.cleaned.clone(),
            outputs: recorded.outputs.clone(),
        },
    )?;

    match &error {
        None => info!(event = "run_finished", status = "success", duration_ms, "run finished"),
        Some(error) => tracing::error!(
            event = "run_finished",
            status = "failed",
            duration_ms,
            error = %error,
            "run failed"
        ),
    }
    results.map(|_| ())
}

async fn connect(db: &DatabaseConfig) -> Result<PgPool, CliError> {
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout())
        .connect(&db.url)
        .await?;
    Ok(pool)
}

async fn build_extractor(config: &StarloadConfig) -> Result<DataExtractor, CliError> {
    let postgres = match &config.source_db {
        Some(db) => Some(PostgresSource::new(connect(db).await?)),
        None => None,
    };
    let http = HttpSource::with_options(config.http_options())?;
    Ok(DataExtractor::new(postgres, http))
}

async fn run_load(args: LoadArgs) -> Result<(), CliError> {
    let config = StarloadConfig::load(&args.config)?;
    let (ctx, paths) = begin_run(
        format!("load {}", args.target),
        args.dry_run,
        args.run_dir.clone(),
        Some(&config),
    )?;
    let timer = Instant::now();

    let result = execute_load(&args, &config, &paths).await;
    finish_run(&ctx, &paths, timer, result)
}

async fn execute_load(
    args: &LoadArgs,
    config: &StarloadConfig,
    paths: &RunPaths,
) -> Result<RunResults, CliError> {
    let extractor = build_extractor(config).await?;
    let mut results = RunResults::default();

    if args.dry_run {
        let entities = match args.target {
            Target::All => load_order()?,
            Target::One(entity) => vec![entity],
        };
        for entity in entities {
            let output = extract_and_clean(&extractor, &config.sources, entity).await?;
            let path = paths.root.join(format!("{}.csv", entity.name()));
            let bytes = write_batch_csv(&path, &output.batch)?;
            info!(
                event = "batch_exported",
                entity = %entity,
                rows = output.batch.len(),
                bytes,
                path = %path.display(),
                "cleaned batch exported"
            );
            results.cleaned.push(output.report);
            results.outputs.push(path);
        }
        return Ok(results);
    }

    let warehouse = config.warehouse.as_ref().ok_or_else(|| {
        CliError::InvalidInput("a [warehouse] section is required unless --dry-run is set".to_string())
    })?;
    let loader = PostgresLoader::new(connect(warehouse).await?);
    let service = StarSchemaService::new(extractor, loader, config.sources.clone());

    results.tables = match args.target {
        Target::All => service.upload_all().await?,
        Target::One(entity) => vec![service.upload(entity).await?],
    };
    results.cleaned = results
        .tables
        .iter()
        .map(|outcome| outcome.clean_report.clone())
        .collect();
    Ok(results)
}

fn run_clean(args: CleanArgs) -> Result<(), CliError> {
    let (ctx, paths) = begin_run(
        format!("clean {}", args.entity),
        false,
        args.run_dir.clone(),
        None,
    )?;
    let timer = Instant::now();

    let result = execute_clean(&args);
    finish_run(&ctx, &paths, timer, result)
}

fn execute_clean(args: &CleanArgs) -> Result<RunResults, CliError> {
    let raw = read_raw_batch(&args.input)?;
    let output = clean(args.entity, raw);
    let bytes = write_batch_csv(&args.out, &output.batch)?;
    info!(
        event = "batch_exported",
        entity = %args.entity,
        rows = output.batch.len(),
        bytes,
        path = %args.out.display(),
        "cleaned batch exported"
    );
    println!(
        "{}: {} rows in, {} rows out -> {}",
        args.entity,
        output.report.rows_in,
        output.report.rows_out,
        args.out.display()
    );

    Ok(RunResults {
        tables: Vec::new(),
        cleaned: vec![output.report],
        outputs: vec![args.out.clone()],
    })
}

fn read_raw_batch(path: &Path) -> Result<Batch, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let batch = match extension.as_deref() {
        Some("json") => {
            let value: serde_json::Value = serde_json::from_slice(&std::fs::read(path)?)
                .map_err(ExtractError::from)?;
            parse_json_batch(&value)?
        }
        Some("csv") => parse_csv_batch(&std::fs::read(path)?)?,
        Some("pdf") => starload_extract::formats::parse_pdf_file(path)?,
        _ => {
            return Err(CliError::InvalidInput(format!(
                "{} is not a .json, .csv or .pdf file",
                path.display()
            )))
        }
    };
    Ok(batch)
}

async fn run_list_tables(args: ListTablesArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let config = StarloadConfig::load(&args.config)?;
    if config.source_db.is_none() {
        return Err(CliError::InvalidInput(
            "a [source_db] section is required to list tables".to_string(),
        ));
    }

    let extractor = build_extractor(&config).await?;
    for table in extractor.list_tables().await? {
        println!("{table}");
    }
    Ok(())
}
