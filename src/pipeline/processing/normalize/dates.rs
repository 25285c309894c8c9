use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::Cell;

/// Date-only layouts seen across the source systems, tried in order.
/// Slash-separated day/month values are read month first.
const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y %B %d",
    "%B %Y %d",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%m/%d/%Y",
    "%Y.%m.%d",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// How a date column is encoded in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Any of the layouts `parse_flexible_date` understands
    Flexible,
    /// Card expiry style `MM/YY`, pinned to the first of the month
    MonthYear,
}

impl DateFormat {
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        match self {
            DateFormat::Flexible => parse_flexible_date(raw),
            DateFormat::MonthYear => parse_month_year(raw),
        }
    }

    /// Parse a cell into a `Date` cell. Dates pass through; anything else that
    /// doesn't parse becomes `Null`.
    pub fn parse_cell(&self, cell: Cell) -> Cell {
        match cell {
            Cell::Date(date) => Cell::Date(date),
            Cell::Text(raw) => self.parse(&raw).into(),
            _ => Cell::Null,
        }
    }
}

pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn parse_month_year(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("01/{value}"), "%d/%m/%y").ok()
}
