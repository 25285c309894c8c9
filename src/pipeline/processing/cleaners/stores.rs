use tracing::debug;

use crate::constants::store::*;
use crate::domain::{RecordKind, Table};
use crate::error::Result;
use crate::pipeline::processing::filter;
use crate::pipeline::processing::validate::{is_valid_latitude, is_valid_longitude, is_valid_store_code};

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Store details aggregated from the stores API
pub struct StoreCleaner;

impl TableCleaner for StoreCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::Store
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        let reference = ctx.reference;

        stages.run("drop_duplicate_latitude", table, |t| {
            Ok(t.drop_columns(&[DUPLICATE_LATITUDE]))
        })?;
        stages.run("invalid_store_codes", table, |t| {
            filter::filter_by_predicate(t, STORE_CODE, is_valid_store_code)
        })?;
        stages.run("correct_continents", table, |t| {
            let corrected = filter::correct_values(t, CONTINENT, |v| reference.continent_correction(v))?;
            debug!(corrected, "Applied literal continent corrections");
            Ok(())
        })?;
        stages.run("invalid_country_codes", table, |t| {
            filter::filter_by_predicate(t, COUNTRY_CODE, |v| reference.is_valid_country_code(v))
        })?;
        stages.run("invalid_continents", table, |t| {
            filter::filter_by_predicate(t, CONTINENT, |v| reference.is_valid_continent(v))
        })?;
        stages.run("future_opening_dates", table, |t| {
            filter::remove_future_dates(t, OPENING_DATE, ctx.today)
        })?;
        if ctx.settings.validate_store_coordinates {
            stages.run("invalid_coordinates", table, |t| {
                filter::filter_by_predicate(t, LATITUDE, is_valid_latitude)?;
                filter::filter_by_predicate(t, LONGITUDE, is_valid_longitude)
            })?;
        }
        stages.run("coerce_numeric", table, |t| {
            NUMERIC
                .iter()
                .try_for_each(|column| filter::coerce_numeric(t, column))
        })?;
        if ctx.settings.store_final_null_sweep {
            stages.run("final_null_sweep", table, |t| Ok(filter::clean_nulls(t)))?;
        }
        Ok(())
    }
}
