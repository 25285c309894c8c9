use crate::constants::user::*;
use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::pipeline::processing::filter;
use crate::pipeline::processing::normalize::DateFormat;
use crate::pipeline::processing::validate::{is_valid_name, is_valid_phone};

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Customer records from the legacy users table
pub struct UserCleaner;

impl TableCleaner for UserCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::User
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        stages.run("drop_nulls", table, |t| Ok(filter::clean_nulls(t)))?;
        stages.run("parse_dates", table, |t| {
            filter::parse_dates(t, DATE_OF_BIRTH, DateFormat::Flexible)?;
            filter::parse_dates(t, JOIN_DATE, DateFormat::Flexible)
        })?;
        stages.run("joined_before_birth", table, |t| {
            filter::remove_date_inversions(t, DATE_OF_BIRTH, JOIN_DATE)
        })?;
        stages.run("future_dates", table, |t| {
            filter::remove_future_dates(t, DATE_OF_BIRTH, ctx.today)?;
            filter::remove_future_dates(t, JOIN_DATE, ctx.today)
        })?;
        stages.run("invalid_names", table, |t| {
            filter::filter_columns(t, &[FIRST_NAME, LAST_NAME], is_valid_name)
        })?;
        stages.run("invalid_phone_numbers", table, |t| {
            filter::filter_by_predicate(t, PHONE_NUMBER, is_valid_phone)
        })?;
        stages.run("final_null_sweep", table, |t| Ok(filter::clean_nulls(t)))
    }
}
