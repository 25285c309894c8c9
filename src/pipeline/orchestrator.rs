use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

use crate::config::TableJob;
use crate::domain::{RecordKind, Table};
use crate::error::{EtlError, Result};
use crate::observability::metrics;
use crate::pipeline::ingestion::{source_for, TableSource};
use crate::pipeline::processing::cleaners::{CleaningReport, DataCleaner};
use crate::pipeline::storage::TableSink;

/// One table to extract, clean and load
pub struct Job {
    pub kind: RecordKind,
    pub destination: String,
    pub source: Box<dyn TableSource>,
}

impl Job {
    pub fn new(kind: RecordKind, destination: impl Into<String>, source: Box<dyn TableSource>) -> Self {
        Self {
            kind,
            destination: destination.into(),
            source,
        }
    }

    pub fn from_config(job: &TableJob) -> Self {
        Self::new(job.kind, job.destination(), source_for(&job.source))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Extract,
    Clean,
    Load,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Extract => "extract",
            Phase::Clean => "clean",
            Phase::Load => "load",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Loaded {
        report: CleaningReport,
        rows_loaded: usize,
    },
    Failed {
        phase: Phase,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    pub kind: RecordKind,
    pub destination: String,
    pub duration_secs: f64,
    pub status: JobStatus,
}

impl TableOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, JobStatus::Loaded { .. })
    }
}

/// Result of a complete run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<TableOutcome>,
}

impl RunSummary {
    pub fn loaded(&self) -> impl Iterator<Item = &TableOutcome> {
        self.outcomes.iter().filter(|o| o.is_loaded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TableOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Runs table jobs one at a time: fetch, clean, load.
///
/// A failing job is logged and counted, then the remaining jobs still run.
pub struct Orchestrator {
    cleaner: DataCleaner,
    sink: Arc<dyn TableSink>,
}

impl Orchestrator {
    pub fn new(cleaner: DataCleaner, sink: Arc<dyn TableSink>) -> Self {
        Self { cleaner, sink }
    }

    pub async fn run(&self, jobs: Vec<Job>) -> RunSummary {
        let mut summary = RunSummary::default();
        info!(jobs = jobs.len(), "Starting ETL run");

        for job in jobs {
            let span = info_span!("table_job", kind = %job.kind, destination = %job.destination);
            let outcome = self.run_job(&job).instrument(span).await;
            summary.outcomes.push(outcome);
        }

        info!(
            loaded = summary.loaded().count(),
            failed = summary.failed().count(),
            "ETL run finished"
        );
        summary
    }

    async fn run_job(&self, job: &Job) -> TableOutcome {
        let start = Instant::now();
        let status = match self.execute(job).await {
            Ok((report, rows_loaded)) => JobStatus::Loaded { report, rows_loaded },
            Err((phase, e)) => {
                error!(phase = phase.as_str(), "Table job failed: {}", e);
                metrics::load::table_failed(job.kind, phase.as_str());
                JobStatus::Failed {
                    phase,
                    error: e.to_string(),
                }
            }
        };

        TableOutcome {
            kind: job.kind,
            destination: job.destination.clone(),
            duration_secs: start.elapsed().as_secs_f64(),
            status,
        }
    }

    async fn execute(&self, job: &Job) -> std::result::Result<(CleaningReport, usize), (Phase, EtlError)> {
        let raw = job.source.fetch().await.map_err(|e| (Phase::Extract, e))?;
        info!(rows = raw.len(), "Extracted {}", job.source.describe());
        metrics::extract::rows_extracted(job.kind, &job.source.describe(), raw.len());

        let (cleaned, report) = self
            .cleaner
            .clean_with_report(raw, job.kind)
            .map_err(|e| (Phase::Clean, e))?;

        let rows_loaded = self
            .load(&job.destination, job.kind, &cleaned)
            .await
            .map_err(|e| (Phase::Load, e))?;

        Ok((report, rows_loaded))
    }

    async fn load(&self, destination: &str, kind: RecordKind, table: &Table) -> Result<usize> {
        let rows = self.sink.load(destination, table).await?;
        metrics::load::rows_loaded(kind, destination, rows);
        Ok(rows)
    }
}
