use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use sales_etl::config::{Config, DEFAULT_CONFIG_PATH};
use sales_etl::logging;
use sales_etl::observability;
use sales_etl::pipeline::ingestion::object_store::FileFormat;
use sales_etl::pipeline::orchestrator::JobStatus;
use sales_etl::pipeline::storage::SqliteTableSink;
use sales_etl::pipeline::{DataCleaner, Job, Orchestrator, RunSummary};
use sales_etl::{RecordKind, ReferenceTables, Table};

const DEFAULT_REFERENCE_PATH: &str = "config/reference.toml";

#[derive(Parser)]
#[command(name = "sales_etl")]
#[command(about = "Extract, clean and load retail sales data")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured extract-clean-load jobs
    Run {
        /// Path to the configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Only run jobs for these kinds (comma-separated), e.g. user,card,store
        #[arg(long)]
        tables: Option<String>,
        /// Print Prometheus metrics when the run finishes
        #[arg(long)]
        print_metrics: bool,
    },
    /// Clean a local CSV or JSON file and write the result as CSV
    Clean {
        /// Record kind: user, card, store, product, order or event_date
        #[arg(long, value_parser = parse_kind)]
        kind: RecordKind,
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value = DEFAULT_REFERENCE_PATH)]
        reference: PathBuf,
    },
}

fn parse_kind(value: &str) -> Result<RecordKind, String> {
    value.parse().map_err(|e: sales_etl::EtlError| e.to_string())
}

fn parse_kinds(list: &str) -> anyhow::Result<Vec<RecordKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<RecordKind>().map_err(anyhow::Error::from))
        .collect()
}

async fn run(config_path: &Path, tables: Option<&str>, print_metrics: bool) -> anyhow::Result<()> {
    let metrics_handle = if print_metrics {
        Some(observability::init()?)
    } else {
        None
    };

    let config = Config::load(config_path)?;
    let kinds = match tables {
        Some(list) => parse_kinds(list)?,
        None => Vec::new(),
    };

    let reference = ReferenceTables::load(&config.reference.path)?;
    let cleaner = DataCleaner::new(Arc::new(reference)).with_settings(config.cleaning.clone());
    let sink = Arc::new(SqliteTableSink::new(&config.destination.sqlite_path));

    let jobs: Vec<Job> = config.jobs_for(&kinds).into_iter().map(Job::from_config).collect();
    if jobs.is_empty() {
        warn!("No table jobs matched the configuration");
        println!("⚠️  No table jobs to run");
        return Ok(());
    }

    println!("🔄 Running {} table job(s)...", jobs.len());
    let summary = Orchestrator::new(cleaner, sink).run(jobs).await;
    print_summary(&summary, &config.destination.sqlite_path);

    if let Some(handle) = metrics_handle {
        println!("\n{}", handle.render());
    }

    let failed = summary.failed().count();
    if failed > 0 {
        bail!("{} table job(s) failed", failed);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, destination: &Path) {
    println!("\n📊 Run results ({}):", destination.display());
    for outcome in &summary.outcomes {
        match &outcome.status {
            JobStatus::Loaded { report, rows_loaded } => {
                println!(
                    "   ✅ {} → {}: {} rows in, {} loaded ({:.2}s)",
                    outcome.kind, outcome.destination, report.rows_in, rows_loaded, outcome.duration_secs
                );
            }
            JobStatus::Failed { phase, error } => {
                println!(
                    "   ❌ {} → {}: failed during {}: {}",
                    outcome.kind,
                    outcome.destination,
                    phase.as_str(),
                    error
                );
            }
        }
    }
}

fn read_table(path: &Path) -> anyhow::Result<Table> {
    let location = path.to_string_lossy();
    let format = FileFormat::from_location(&location)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
    Ok(format.parse(&content)?)
}

fn write_csv(path: &Path, table: &Table) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn clean(kind: RecordKind, input: &Path, output: &Path, reference: &Path) -> anyhow::Result<()> {
    let reference = ReferenceTables::load(reference)?;
    let table = read_table(input)?;
    info!(rows = table.len(), "Read {}", input.display());

    let cleaner = DataCleaner::new(Arc::new(reference));
    let (cleaned, report) = cleaner.clean_with_report(table, kind)?;
    write_csv(output, &cleaned)?;

    println!("🧹 {}", report);
    println!("💾 Wrote {} rows to {}", cleaned.len(), output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            tables,
            print_metrics,
        } => run(&config, tables.as_deref(), print_metrics).await,
        Commands::Clean {
            kind,
            input,
            output,
            reference,
        } => clean(kind, &input, &output, &reference),
    }
}
