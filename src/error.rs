use thiserror::Error;

use crate::domain::RecordKind;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("row has {found} cells but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Reference table error: {0}")]
    Reference(String),

    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No cleaner registered for {0}")]
    NoCleaner(RecordKind),

    #[error("Source '{source_name}' failed: {message}")]
    Source { source_name: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

impl EtlError {
    pub fn missing_column(table: impl std::fmt::Display, column: &str) -> Self {
        EtlError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
