//! Row filters over named columns.
//!
//! Filters only ever remove rows or rewrite a column in place; surviving rows
//! keep their input order. Column lookups happen before any row is touched,
//! so a missing column leaves the table unchanged.

use chrono::NaiveDate;

use crate::domain::{Cell, Table};
use crate::error::Result;
use crate::pipeline::processing::normalize::DateFormat;
use crate::pipeline::processing::validate::predicates::{is_integer, is_null_marker, parse_float};

/// Drop rows holding a structural null in any column, then rows where any
/// text cell is a null marker such as `"NULL"` or `"n/a"`.
pub fn clean_nulls(table: &mut Table) -> usize {
    let structural = table.retain_rows(|row| !row.iter().any(Cell::is_null));
    let markers = table.retain_rows(|row| !row.iter().any(is_null_marker_cell));
    structural + markers
}

fn is_null_marker_cell(cell: &Cell) -> bool {
    matches!(cell, Cell::Text(value) if is_null_marker(value))
}

/// Keep rows whose `column` value satisfies `predicate`. Null cells never do.
pub fn filter_by_predicate<P>(table: &mut Table, column: &str, predicate: P) -> Result<usize>
where
    P: Fn(&str) -> bool,
{
    filter_columns(table, &[column], predicate)
}

/// Keep rows where `predicate` holds for every one of `columns`
pub fn filter_columns<P>(table: &mut Table, columns: &[&str], predicate: P) -> Result<usize>
where
    P: Fn(&str) -> bool,
{
    let indices = columns
        .iter()
        .map(|column| table.require_column(column))
        .collect::<Result<Vec<_>>>()?;
    Ok(table.retain_rows(|row| {
        indices
            .iter()
            .all(|&idx| !row[idx].is_null() && predicate(&row[idx].render()))
    }))
}

/// Parse a column into `Date` cells; unparseable values become `Null`
pub fn parse_dates(table: &mut Table, column: &str, format: DateFormat) -> Result<()> {
    table.map_column(column, |cell| format.parse_cell(cell))
}

/// Parse `column` as flexible dates and drop rows dated strictly after `today`.
/// Unparseable dates are left as `Null` for a later null sweep.
pub fn remove_future_dates(table: &mut Table, column: &str, today: NaiveDate) -> Result<usize> {
    parse_dates(table, column, DateFormat::Flexible)?;
    let idx = table.require_column(column)?;
    Ok(table.retain_rows(|row| row[idx].as_date().map_or(true, |date| date <= today)))
}

/// Drop rows where the `later` date precedes the `earlier` one.
/// Rows missing either date are kept.
pub fn remove_date_inversions(table: &mut Table, earlier: &str, later: &str) -> Result<usize> {
    let earlier_idx = table.require_column(earlier)?;
    let later_idx = table.require_column(later)?;
    Ok(table.retain_rows(|row| {
        match (row[earlier_idx].as_date(), row[later_idx].as_date()) {
            (Some(first), Some(second)) => second >= first,
            _ => true,
        }
    }))
}

/// Coerce a column to numbers; unparseable values become `Null`
pub fn coerce_numeric(table: &mut Table, column: &str) -> Result<()> {
    table.map_column(column, numeric_cell)
}

pub fn numeric_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Integer(_) => cell,
        Cell::Float(value) if value.is_finite() => cell,
        Cell::Text(raw) => {
            let trimmed = raw.trim();
            let integer = if is_integer(trimmed) {
                trimmed.parse::<i64>().ok()
            } else {
                None
            };
            match integer {
                Some(value) => Cell::Integer(value),
                None => parse_float(trimmed).filter(|v| v.is_finite()).into(),
            }
        }
        _ => Cell::Null,
    }
}

/// Replace whole-cell text values for which `correction` returns a fix.
/// Returns the number of cells rewritten.
pub fn correct_values<'a, F>(table: &mut Table, column: &str, correction: F) -> Result<usize>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut corrected = 0;
    table.map_column(column, |cell| match cell {
        Cell::Text(value) => match correction(&value) {
            Some(fixed) => {
                corrected += 1;
                Cell::text(fixed)
            }
            None => Cell::Text(value),
        },
        other => other,
    })?;
    Ok(corrected)
}
