use crate::constants::product::*;
use crate::domain::{RecordKind, Table};
use crate::error::{EtlError, Result};
use crate::pipeline::processing::filter;
use crate::pipeline::processing::normalize::units::{price_cell, weight_cell};
use crate::pipeline::processing::validate::{is_valid_ean, is_valid_product_code, is_valid_uuid};

use super::{CleaningContext, StageRecorder, TableCleaner};

/// Product catalogue. Weights are normalized to kilograms and the column is
/// renamed to `weight_in_kg`.
pub struct ProductCleaner;

impl ProductCleaner {
    fn normalize_weights(table: &mut Table) -> Result<()> {
        if table.has_column(WEIGHT) {
            table.map_column(WEIGHT, weight_cell)?;
            table.rename_column(WEIGHT, WEIGHT_IN_KG)
        } else if table.has_column(WEIGHT_IN_KG) {
            // already normalized by an earlier pass
            Ok(())
        } else {
            Err(EtlError::missing_column(RecordKind::Product, WEIGHT))
        }
    }
}

impl TableCleaner for ProductCleaner {
    fn kind(&self) -> RecordKind {
        RecordKind::Product
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &REQUIRED
    }

    fn clean(&self, table: &mut Table, ctx: &CleaningContext<'_>, stages: &mut StageRecorder) -> Result<()> {
        stages.run("drop_nulls", table, |t| Ok(filter::clean_nulls(t)))?;
        stages.run("normalize_weights", table, Self::normalize_weights)?;
        if ctx.settings.normalize_product_prices {
            stages.run("normalize_prices", table, |t| t.map_column(PRICE, price_cell))?;
        }
        stages.run("invalid_uuids", table, |t| {
            filter::filter_by_predicate(t, UUID, is_valid_uuid)
        })?;
        stages.run("future_dates_added", table, |t| {
            filter::remove_future_dates(t, DATE_ADDED, ctx.today)
        })?;
        if ctx.settings.validate_product_codes {
            stages.run("invalid_product_codes", table, |t| {
                filter::filter_by_predicate(t, PRODUCT_CODE, is_valid_product_code)?;
                filter::filter_by_predicate(t, EAN, is_valid_ean)
            })?;
        }
        stages.run("final_null_sweep", table, |t| Ok(filter::clean_nulls(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::CleaningSettings;
    use crate::domain::{Cell, RecordKind, Table};
    use crate::error::EtlError;

    const COLUMNS: [&str; 7] = ["product_name", "product_price", "weight", "EAN", "date_added", "uuid", "product_code"];
    const UUID_A: &str = "83dc0a69-f96f-4c34-bcb7-928acae19a94";
    const UUID_B: &str = "712254d7-aea7-4310-aad9-f1ad27f3a4d9";

    fn products() -> Table {
        table(
            &COLUMNS,
            &[
                &["Pen", "£1.99", "250g", "1234567890123", "2020-01-01", UUID_A, "A8-4686892S"],
                &["Jam", "£3.00", "3 oz", "1234567890124", "2020-01-01", UUID_A, "B8-4686892S"],
                &["Cup", "£4.00", "1kg", "1234567890125", "2020-01-01", "bad", "C8-4686892S"],
                &["Mug", "£5.00", "1kg", "1234567890126", "2024-06-02", UUID_A, "D8-4686892S"],
                &["NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL"],
                &["Tea", "£2.50", "1.5kg", "123", "2019-05-10", UUID_B, "E8-4686892S"],
                &["Oil", "£6.10", "500ml", "1234567890127", "2021-02-03", UUID_B, "F8-4686892S"],
            ],
        )
    }

    #[test]
    fn test_product_pipeline_normalizes_weights() {
        let (output, report) = cleaner().clean_with_report(products(), RecordKind::Product).unwrap();

        assert!(!output.has_column("weight"));
        assert_eq!(column(&output, "product_name"), vec!["Pen", "Tea", "Oil"]);
        let weights: Vec<_> = output.column_values("weight_in_kg").unwrap().cloned().collect();
        assert_eq!(weights, vec![Cell::Float(0.25), Cell::Float(1.5), Cell::Float(0.5)]);
        assert_eq!(report.removed_by("drop_nulls"), 1);
        assert_eq!(report.removed_by("invalid_uuids"), 1);
        assert_eq!(report.removed_by("future_dates_added"), 1);
        assert_eq!(report.removed_by("final_null_sweep"), 1);
        // prices are untouched unless enabled
        assert_eq!(output.cell(0, "product_price"), Some(&Cell::text("£1.99")));
    }

    #[test]
    fn test_product_cleaning_is_idempotent() {
        let cleaner = cleaner();
        let once = cleaner.clean(products(), RecordKind::Product).unwrap();
        let twice = cleaner.clean(once.clone(), RecordKind::Product).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_numeric_weights_pass_through() {
        let mut input = table(&COLUMNS, &[&["Pen", "£1.99", "", "1234567890123", "2020-01-01", UUID_A, "A8-4686892S"]]);
        input.map_column("weight", |_| Cell::Float(1.5)).unwrap();

        let output = cleaner().clean(input, RecordKind::Product).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.cell(0, "weight_in_kg"), Some(&Cell::Float(1.5)));
    }

    #[test]
    fn test_missing_weight_column_is_fatal() {
        let mut input = products();
        input.drop_columns(&["weight"]);
        let err = cleaner().clean(input, RecordKind::Product).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { ref column, .. } if column == "weight"));
    }

    #[test]
    fn test_optional_price_and_code_stages() {
        let settings = CleaningSettings {
            normalize_product_prices: true,
            validate_product_codes: true,
            ..CleaningSettings::default()
        };
        let (output, report) = cleaner()
            .with_settings(settings)
            .clean_with_report(products(), RecordKind::Product)
            .unwrap();

        // Tea has a short EAN
        assert_eq!(column(&output, "product_name"), vec!["Pen", "Oil"]);
        assert_eq!(report.removed_by("invalid_product_codes"), 1);
        assert_eq!(output.cell(0, "product_price"), Some(&Cell::Float(1.99)));
    }
}
