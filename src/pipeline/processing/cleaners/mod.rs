use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::{RecordKind, Table};
use crate::error::{EtlError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::validate::ReferenceTables;

pub mod cards;
pub mod event_dates;
pub mod orders;
pub mod products;
pub mod report;
pub mod stores;
pub mod users;

pub use cards::CardCleaner;
pub use event_dates::EventDateCleaner;
pub use orders::OrderCleaner;
pub use products::ProductCleaner;
pub use report::{CleaningReport, StageRecorder, StageReport};
pub use stores::StoreCleaner;
pub use users::UserCleaner;

/// Optional stages, toggled from the `[cleaning]` config section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CleaningSettings {
    /// Sweep nulls introduced by numeric coercion of store columns
    pub store_final_null_sweep: bool,
    pub validate_store_coordinates: bool,
    pub validate_product_codes: bool,
    pub normalize_product_prices: bool,
}

impl Default for CleaningSettings {
    fn default() -> Self {
        Self {
            store_final_null_sweep: true,
            validate_store_coordinates: false,
            validate_product_codes: false,
            normalize_product_prices: false,
        }
    }
}

/// Read-only inputs shared by every stage of one cleaning call
pub struct CleaningContext<'a> {
    pub reference: &'a ReferenceTables,
    pub settings: &'a CleaningSettings,
    /// Dates strictly after this are in the future
    pub today: NaiveDate,
}

/// A fixed, ordered cleaning pipeline for one record kind.
///
/// Row content never produces an error: malformed rows are removed. Errors are
/// reserved for structural problems such as a missing column.
pub trait TableCleaner: Send + Sync {
    fn kind(&self) -> RecordKind;

    /// Columns that must be present before the pipeline starts
    fn required_columns(&self) -> &'static [&'static str];

    fn clean(&self, table: &mut Table, ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()>;
}

/// Dispatches tables to the cleaner registered for their record kind
pub struct DataCleaner {
    cleaners: HashMap<RecordKind, Box<dyn TableCleaner>>,
    reference: Arc<ReferenceTables>,
    settings: CleaningSettings,
    reference_date: Option<NaiveDate>,
}

impl DataCleaner {
    /// Create a cleaner with the built-in pipeline for every record kind
    pub fn new(reference: Arc<ReferenceTables>) -> Self {
        let mut cleaner = Self {
            cleaners: HashMap::new(),
            reference,
            settings: CleaningSettings::default(),
            reference_date: None,
        };

        cleaner.register(Box::new(UserCleaner));
        cleaner.register(Box::new(CardCleaner));
        cleaner.register(Box::new(StoreCleaner));
        cleaner.register(Box::new(ProductCleaner));
        cleaner.register(Box::new(OrderCleaner));
        cleaner.register(Box::new(EventDateCleaner));

        cleaner
    }

    pub fn with_settings(mut self, settings: CleaningSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Pin "today" for future-date checks instead of reading the local clock
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Register a cleaner, replacing any existing one for the same kind
    pub fn register(&mut self, cleaner: Box<dyn TableCleaner>) {
        self.cleaners.insert(cleaner.kind(), cleaner);
    }

    pub fn get_cleaner(&self, kind: RecordKind) -> Option<&dyn TableCleaner> {
        self.cleaners.get(&kind).map(|c| c.as_ref())
    }

    /// Registered kinds in declaration order
    pub fn kinds(&self) -> Vec<RecordKind> {
        RecordKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.cleaners.contains_key(kind))
            .collect()
    }

    pub fn clean(&self, table: Table, kind: RecordKind) -> Result<Table> {
        self.clean_with_report(table, kind).map(|(table, _)| table)
    }

    pub fn clean_with_report(&self, mut table: Table, kind: RecordKind) -> Result<(Table, CleaningReport)> {
        let cleaner = self.get_cleaner(kind).ok_or(EtlError::NoCleaner(kind))?;

        for column in cleaner.required_columns() {
            if !table.has_column(column) {
                return Err(EtlError::missing_column(kind, column));
            }
        }

        let ctx = CleaningContext {
            reference: &self.reference,
            settings: &self.settings,
            today: self
                .reference_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
        };

        let start = Instant::now();
        let rows_in = table.len();
        debug!(%kind, rows_in, today = %ctx.today, "Cleaning table");

        let mut stages = StageRecorder::new(kind);
        cleaner.clean(&mut table, &ctx, &mut stages)?;

        let report = stages.finish(rows_in, table.len());
        metrics::cleaning::table_cleaned(kind, report.rows_out, start.elapsed().as_secs_f64());
        info!(
            %kind,
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            removed = report.rows_removed(),
            "Cleaned table"
        );

        Ok((table, report))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::Cell;

    #[test]
    fn test_registry_has_every_kind() {
        let cleaner = cleaner();
        assert_eq!(cleaner.kinds(), RecordKind::ALL.to_vec());
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let input = table(&["date_uuid", "user_uuid"], &[&["a", "b"]]);
        let err = cleaner().clean(input, RecordKind::Order).unwrap_err();
        match err {
            EtlError::MissingColumn { table, column } => {
                assert_eq!(table, "order");
                assert_eq!(column, "card_number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_report_accounts_for_every_removed_row() {
        let input = table(
            &["date_uuid", "timestamp"],
            &[
                &["acde070d-8c4c-4f0d-9d8a-162843c10333", "22:00:06"],
                &["", "22:00:06"],
                &["NULL", "22:00:06"],
                &["not-a-uuid", "09:00:00"],
            ],
        );
        let (output, report) = cleaner()
            .clean_with_report(input, RecordKind::EventDate)
            .unwrap();

        assert_eq!(output.len(), 1);
        assert_eq!(report.rows_in, 4);
        assert_eq!(report.rows_out, 1);
        assert_eq!(report.removed_by("drop_nulls"), 2);
        assert_eq!(report.removed_by("invalid_date_uuids"), 1);
        let total: usize = report.stages.iter().map(|s| s.removed).sum();
        assert_eq!(total, report.rows_removed());
    }

    struct KeepFirstRow;

    impl TableCleaner for KeepFirstRow {
        fn kind(&self) -> RecordKind {
            RecordKind::Order
        }

        fn required_columns(&self) -> &'static [&'static str] {
            &[]
        }

        fn clean(&self, table: &mut Table, _ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
            stages.run("keep_first", table, |t| {
                let mut seen = false;
                Ok(t.retain_rows(|_| !std::mem::replace(&mut seen, true)))
            })
        }
    }

    #[test]
    fn test_register_replaces_builtin_cleaner() {
        let mut cleaner = cleaner();
        cleaner.register(Box::new(KeepFirstRow));

        let input = Table::from_rows(["x"], vec![vec![Cell::Null], vec![Cell::text("b")]]).unwrap();
        let output = cleaner.clean(input, RecordKind::Order).unwrap();
        assert_eq!(output.rows(), &[vec![Cell::Null]]);
    }

    struct DuplicateRows;

    impl TableCleaner for DuplicateRows {
        fn kind(&self) -> RecordKind {
            RecordKind::EventDate
        }

        fn required_columns(&self) -> &'static [&'static str] {
            &[]
        }

        fn clean(&self, table: &mut Table, _ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
            stages.run("duplicate", table, |t| {
                let rows = t.rows().to_vec();
                rows.into_iter().try_for_each(|row| t.push_row(row))
            })
        }
    }

    #[test]
    fn test_stage_that_adds_rows_reports_zero_removed() {
        let mut cleaner = cleaner();
        cleaner.register(Box::new(DuplicateRows));

        let input = Table::from_rows(["x"], vec![vec![Cell::text("a")]]).unwrap();
        let (output, report) = cleaner.clean_with_report(input, RecordKind::EventDate).unwrap();
        assert_eq!(output.len(), 2);
        assert_eq!(report.removed_by("duplicate"), 0);
        assert_eq!(report.rows_removed(), 0);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: CleaningSettings = toml::from_str("validate_product_codes = true").unwrap();
        assert!(settings.store_final_null_sweep);
        assert!(settings.validate_product_codes);
        assert!(!settings.normalize_product_prices);
    }
}
