use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::TableSink;
use crate::domain::Table;
use crate::error::Result;

/// Keeps loaded tables in memory, for tests and dry runs
#[derive(Clone, Default)]
pub struct InMemorySink {
    tables: Arc<Mutex<HashMap<String, Table>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Table> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.get(name).cloned()
    }

    pub fn table_names(&self) -> Vec<String> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<_> = tables.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl TableSink for InMemorySink {
    async fn load(&self, name: &str, table: &Table) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.insert(name.to_string(), table.clone());
        debug!(rows = table.len(), "Stored table '{}' in memory", name);
        Ok(table.len())
    }
}
