//! Metrics for the ETL run.
//!
//! Recording goes through the `metrics` facade. Until `init` installs the
//! Prometheus recorder every call below is a no-op, so library callers and
//! tests never need to set anything up.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use tracing::info;

use crate::error::{EtlError, Result};

/// Every metric name the pipeline records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Extraction
    RowsExtracted,

    // Cleaning
    RowsCleaned,
    RowsRemoved,
    CleanDuration,

    // Loading
    RowsLoaded,
    TableFailures,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsExtracted => "etl_rows_extracted_total",
            MetricName::RowsCleaned => "etl_rows_cleaned_total",
            MetricName::RowsRemoved => "etl_rows_removed_total",
            MetricName::CleanDuration => "etl_clean_duration_seconds",
            MetricName::RowsLoaded => "etl_rows_loaded_total",
            MetricName::TableFailures => "etl_table_failures_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RowsExtracted,
            RowsCleaned,
            RowsRemoved,
            CleanDuration,
            RowsLoaded,
            TableFailures,
        ]
        .into_iter()
    }

    /// (phase, description)
    pub fn metadata(&self) -> (&'static str, &'static str) {
        match self {
            MetricName::RowsExtracted => ("extract", "Rows read from a source"),
            MetricName::RowsCleaned => ("clean", "Rows surviving a cleaning pipeline"),
            MetricName::RowsRemoved => ("clean", "Rows removed by a cleaning stage"),
            MetricName::CleanDuration => ("clean", "Time spent cleaning one table"),
            MetricName::RowsLoaded => ("load", "Rows written to the destination store"),
            MetricName::TableFailures => ("load", "Table jobs that failed"),
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder and return a handle for rendering
pub fn init() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EtlError::Config(format!("Failed to install Prometheus recorder: {}", e)))?;

    for metric in MetricName::all_metrics() {
        let (_, description) = metric.metadata();
        match metric {
            MetricName::CleanDuration => ::metrics::describe_histogram!(metric.as_str(), description),
            _ => ::metrics::describe_counter!(metric.as_str(), description),
        }
    }

    info!("Metrics recorder installed");
    Ok(handle)
}

// ============================================================================
// Extraction Metrics
// ============================================================================

pub mod extract {
    use super::MetricName;
    use crate::domain::RecordKind;

    pub fn rows_extracted(kind: RecordKind, source: &str, rows: usize) {
        ::metrics::counter!(MetricName::RowsExtracted.as_str(),
            "kind" => kind.as_str(),
            "source" => source.to_string()
        )
        .increment(rows as u64);
    }
}

// ============================================================================
// Cleaning Metrics
// ============================================================================

pub mod cleaning {
    use super::MetricName;
    use crate::domain::RecordKind;

    /// Rows removed by one named stage
    pub fn rows_removed(kind: RecordKind, stage: &str, removed: usize) {
        ::metrics::counter!(MetricName::RowsRemoved.as_str(),
            "kind" => kind.as_str(),
            "stage" => stage.to_string()
        )
        .increment(removed as u64);
    }

    pub fn table_cleaned(kind: RecordKind, rows_out: usize, secs: f64) {
        ::metrics::counter!(MetricName::RowsCleaned.as_str(), "kind" => kind.as_str())
            .increment(rows_out as u64);
        ::metrics::histogram!(MetricName::CleanDuration.as_str(), "kind" => kind.as_str()).record(secs);
    }
}

// ============================================================================
// Load Metrics
// ============================================================================

pub mod load {
    use super::MetricName;
    use crate::domain::RecordKind;

    pub fn rows_loaded(kind: RecordKind, table: &str, rows: usize) {
        ::metrics::counter!(MetricName::RowsLoaded.as_str(),
            "kind" => kind.as_str(),
            "table" => table.to_string()
        )
        .increment(rows as u64);
    }

    pub fn table_failed(kind: RecordKind, phase: &'static str) {
        ::metrics::counter!(MetricName::TableFailures.as_str(),
            "kind" => kind.as_str(),
            "phase" => phase
        )
        .increment(1);
    }
}
