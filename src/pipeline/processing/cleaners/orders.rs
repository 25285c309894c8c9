use tracing::debug;

use crate::constants::order::*;
use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::pipeline::processing::filter;

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Orders fact table. Field values are validated upstream; only join
/// leftovers and nulls are removed here.
pub struct OrderCleaner;

impl TableCleaner for OrderCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::Order
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, _ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        stages.run("drop_extraneous_columns", table, |t| {
            let dropped = t.drop_columns(&EXTRANEOUS);
            debug!(?dropped, "Dropped extraneous order columns");
            Ok(())
        })?;
        stages.run("drop_nulls", table, |t| Ok(filter::clean_nulls(t)))
    }
}
