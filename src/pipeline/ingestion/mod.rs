//! Extraction collaborators.
//!
//! Each source turns one external table into a [`Table`]. They are thin I/O
//! wrappers: no validation happens here beyond what's needed to build rows.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::SourceConfig;
use crate::domain::{Cell, Table};
use crate::error::Result;

pub mod database;
pub mod object_store;
pub mod pdf;
pub mod store_api;

pub use database::DatabaseTableSource;
pub use object_store::ObjectStoreSource;
pub use pdf::PdfTableSource;
pub use store_api::StoreApiSource;

#[async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(&self) -> Result<Table>;

    /// Short human-readable description used in logs
    fn describe(&self) -> String;
}

/// Build the source collaborator for a configured job
pub fn source_for(config: &SourceConfig) -> Box<dyn TableSource> {
    match config {
        SourceConfig::Database { path, table } => Box::new(DatabaseTableSource::new(path, table)),
        SourceConfig::Pdf { location } => Box::new(PdfTableSource::new(location)),
        SourceConfig::StoreApi {
            base_url,
            api_key_env,
        } => Box::new(StoreApiSource::new(base_url, api_key_env)),
        SourceConfig::ObjectStore { location, region } => {
            Box::new(ObjectStoreSource::new(location, region.as_deref()))
        }
    }
}

pub(crate) fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read the raw bytes behind a local path or an http(s) URL
pub(crate) async fn read_location(location: &str) -> Result<Vec<u8>> {
    if is_remote(location) {
        let response = reqwest::get(location).await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    } else {
        Ok(tokio::fs::read(location).await?)
    }
}

pub(crate) fn cell_from_json(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::String(s) => Cell::text(s.as_str()),
        Value::Number(n) => n
            .as_i64()
            .map(Cell::Integer)
            .or_else(|| n.as_f64().map(Cell::Float))
            .unwrap_or(Cell::Null),
        Value::Bool(b) => Cell::text(b.to_string()),
        other => Cell::text(other.to_string()),
    }
}

/// Build a table from JSON objects. Columns appear in first-seen order and
/// keys missing from an object become nulls.
pub(crate) fn rows_from_json_objects<'a, I>(objects: I) -> Result<Table>
where
    I: IntoIterator<Item = &'a serde_json::Map<String, Value>>,
{
    let objects: Vec<_> = objects.into_iter().collect();

    let mut columns: Vec<&str> = Vec::new();
    for object in &objects {
        for key in object.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new(columns.iter().copied());
    for object in &objects {
        let row = columns
            .iter()
            .map(|column| object.get(*column).map(cell_from_json).unwrap_or_default())
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_objects_become_rows_in_first_seen_column_order() {
        let objects = vec![
            json!({"store_code": "HI-9B97EE4E", "staff_numbers": 34}),
            json!({"store_code": "WEB-1388012W", "lat": null, "latitude": 51.5}),
        ];
        let maps: Vec<_> = objects.iter().filter_map(Value::as_object).collect();
        let table = rows_from_json_objects(maps).unwrap();

        assert_eq!(table.columns(), &["store_code", "staff_numbers", "lat", "latitude"]);
        assert_eq!(table.cell(0, "staff_numbers"), Some(&Cell::Integer(34)));
        assert_eq!(table.cell(0, "latitude"), Some(&Cell::Null));
        assert_eq!(table.cell(1, "latitude"), Some(&Cell::Float(51.5)));
    }

    #[test]
    fn test_source_for_describes_each_variant() {
        let source = source_for(&SourceConfig::Pdf {
            location: "cards.pdf".to_string(),
        });
        assert!(source.describe().contains("cards.pdf"));
    }
}
