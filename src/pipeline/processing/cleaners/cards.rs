use crate::constants::card::*;
use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::pipeline::processing::filter;
use crate::pipeline::processing::normalize::DateFormat;
use crate::pipeline::processing::validate::is_valid_card_number;

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Payment card details. Expired cards are kept: expiry alone is not a reason to drop a row.
pub struct CardCleaner;

impl TableCleaner for CardCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::Card
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        stages.run("drop_nulls", table, |t| Ok(filter::clean_nulls(t)))?;
        stages.run("parse_dates", table, |t| {
            filter::parse_dates(t, EXPIRY_DATE, DateFormat::MonthYear)?;
            filter::parse_dates(t, DATE_PAYMENT_CONFIRMED, DateFormat::Flexible)
        })?;
        stages.run("future_payment_dates", table, |t| {
            filter::remove_future_dates(t, DATE_PAYMENT_CONFIRMED, ctx.today)
        })?;
        stages.run("invalid_card_numbers", table, |t| {
            filter::filter_by_predicate(t, CARD_NUMBER, is_valid_card_number)
        })?;
        stages.run("final_null_sweep", table, |t| Ok(filter::clean_nulls(t)))
    }
}
