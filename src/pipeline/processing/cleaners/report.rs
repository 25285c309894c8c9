use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::observability::metrics;

/// Rows removed by one stage of a cleaning pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub removed: usize,
}

/// Summary of one cleaning call. Counts only; no per-row reasons are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    pub kind: RecordKind,
    pub rows_in: usize,
    pub rows_out: usize,
    pub stages: Vec<StageReport>,
}

impl CleaningReport {
    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    pub fn removed_by(&self, stage: &str) -> usize {
        self.stages
            .iter()
            .filter(|s| s.stage == stage)
            .map(|s| s.removed)
            .sum()
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} rows in, {} rows out ({} removed)",
            self.kind,
            self.rows_in,
            self.rows_out,
            self.rows_removed()
        )?;
        for stage in &self.stages {
            writeln!(f, "   - {:<28} {:>6}", stage.stage, stage.removed)?;
        }
        Ok(())
    }
}

/// Runs pipeline stages against a table and records how many rows each removed
pub struct StageRecorder {
    kind: RecordKind,
    stages: Vec<StageReport>,
}

impl StageRecorder {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            stages: Vec::new(),
        }
    }

    pub fn run<R, F>(&mut self, stage: &str, table: &mut Table, f: F) -> Result<()>
    where
        F: FnOnce(&mut Table) -> Result<R>,
    {
        let before = table.len();
        f(table)?;
        let removed = before.saturating_sub(table.len());

        debug!(kind = %self.kind, stage, removed, remaining = table.len(), "Stage finished");
        metrics::cleaning::rows_removed(self.kind, stage, removed);

        self.stages.push(StageReport {
            stage: stage.to_string(),
            removed,
        });
        Ok(())
    }

    pub fn finish(self, rows_in: usize, rows_out: usize) -> CleaningReport {
        CleaningReport {
            kind: self.kind,
            rows_in,
            rows_out,
            stages: self.stages,
        }
    }
}
