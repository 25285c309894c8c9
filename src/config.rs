use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::RecordKind;
use crate::error::{EtlError, Result};
use crate::pipeline::processing::cleaners::CleaningSettings;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub reference: ReferenceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub cleaning: CleaningSettings,
    #[serde(default)]
    pub tables: Vec<TableJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DestinationConfig {
    pub sqlite_path: PathBuf,
}

/// One extract-clean-load job
#[derive(Debug, Clone, Deserialize)]
pub struct TableJob {
    pub kind: RecordKind,
    pub destination_table: Option<String>,
    pub source: SourceConfig,
}

impl TableJob {
    pub fn destination(&self) -> &str {
        self.destination_table
            .as_deref()
            .unwrap_or_else(|| self.kind.default_destination())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A table in a SQLite database file
    Database { path: PathBuf, table: String },
    /// A table printed in a PDF, local path or http(s) URL
    Pdf { location: String },
    /// The paginated stores API
    StoreApi { base_url: String, api_key_env: String },
    /// A CSV or JSON object, as an `s3://` URI, http(s) URL or local path
    ObjectStore {
        location: String,
        #[serde(default)]
        region: Option<String>,
    },
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Jobs whose kind is in `kinds`; all jobs when `kinds` is empty
    pub fn jobs_for(&self, kinds: &[RecordKind]) -> Vec<&TableJob> {
        self.tables
            .iter()
            .filter(|job| kinds.is_empty() || kinds.contains(&job.kind))
            .collect()
    }
}
