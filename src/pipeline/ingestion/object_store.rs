use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

use super::{cell_from_json, read_location, rows_from_json_objects, TableSource};
use crate::domain::{Cell, Table};
use crate::error::{EtlError, Result};

/// File formats an object-store location can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Infer the format from the location's extension, ignoring any query string
    pub fn from_location(location: &str) -> Result<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(EtlError::UnsupportedFormat(location.to_string())),
        }
    }

    pub fn parse(&self, content: &str) -> Result<Table> {
        match self {
            FileFormat::Csv => parse_csv(content),
            FileFormat::Json => parse_json(content),
        }
    }
}

/// Reads a CSV or JSON file from S3, an http(s) URL or the local disk
pub struct ObjectStoreSource {
    location: String,
    region: Option<String>,
}

impl ObjectStoreSource {
    pub fn new(location: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            location: location.into(),
            region: region.map(str::to_string),
        }
    }

    pub fn url(&self) -> String {
        resolve_location(&self.location, self.region.as_deref())
    }
}

/// Map `s3://bucket/key` to the bucket's public virtual-hosted URL.
/// Anything else is returned unchanged.
pub fn resolve_location(location: &str, region: Option<&str>) -> String {
    match location.strip_prefix("s3://").and_then(|rest| rest.split_once('/')) {
        Some((bucket, key)) => match region {
            Some(region) => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
            None => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
        },
        None => location.to_string(),
    }
}

/// Parse CSV with a header row. Empty fields become nulls.
pub fn parse_csv(content: &str) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let mut table = Table::new(headers.iter());
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| if field.is_empty() { Cell::Null } else { Cell::text(field) })
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Parse JSON holding either an array of records or a column-oriented
/// object (`{"column": {"0": value, "1": value}}`).
pub fn parse_json(content: &str) -> Result<Table> {
    let value: Value = serde_json::from_str(content)?;
    match value {
        Value::Array(records) => {
            let objects = records
                .iter()
                .map(|record| {
                    record.as_object().ok_or_else(|| {
                        EtlError::UnsupportedFormat(format!("expected a JSON object per record, got {}", record))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows_from_json_objects(objects)
        }
        Value::Object(columns) => parse_column_oriented(&columns),
        other => Err(EtlError::UnsupportedFormat(format!(
            "expected a JSON array or object, got {}",
            other
        ))),
    }
}

/// Row keys are unioned across columns. Numeric keys sort numerically.
fn parse_column_oriented(columns: &serde_json::Map<String, Value>) -> Result<Table> {
    let mut keys: BTreeSet<RowKey> = BTreeSet::new();
    for (name, values) in columns {
        let values = values.as_object().ok_or_else(|| {
            EtlError::UnsupportedFormat(format!("column '{}' is not an object of row values", name))
        })?;
        keys.extend(values.keys().map(|k| RowKey::from(k.as_str())));
    }

    let mut table = Table::new(columns.keys());
    for key in &keys {
        let row = columns
            .values()
            .map(|values| {
                values
                    .get(key.as_str())
                    .map(cell_from_json)
                    .unwrap_or_default()
            })
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RowKey {
    Index(u64, String),
    Name(String),
}

impl RowKey {
    fn as_str(&self) -> &str {
        match self {
            RowKey::Index(_, raw) | RowKey::Name(raw) => raw,
        }
    }
}

impl From<&str> for RowKey {
    fn from(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(index) => RowKey::Index(index, raw.to_string()),
            Err(_) => RowKey::Name(raw.to_string()),
        }
    }
}

#[async_trait]
impl TableSource for ObjectStoreSource {
    async fn fetch(&self) -> Result<Table> {
        let format = FileFormat::from_location(&self.location)?;
        let url = self.url();
        let bytes = read_location(&url).await?;
        debug!(bytes = bytes.len(), ?format, "Downloaded {}", url);

        let content = String::from_utf8_lossy(&bytes);
        format.parse(&content)
    }

    fn describe(&self) -> String {
        format!("object {}", self.location)
    }
}
