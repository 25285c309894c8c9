use crate::constants::event_date::*;
use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::pipeline::processing::filter;
use crate::pipeline::processing::validate::is_valid_uuid;

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Sale timestamps keyed by `date_uuid`
pub struct EventDateCleaner;

impl TableCleaner for EventDateCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::EventDate
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, _ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        stages.run("drop_nulls", table, |t| Ok(filter::clean_nulls(t)))?;
        stages.run("invalid_date_uuids", table, |t| {
            filter::filter_by_predicate(t, DATE_UUID, is_valid_uuid)
        })
    }
}
