use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::TableSource;
use crate::domain::{Cell, Table};
use crate::error::{EtlError, Result};
use crate::pipeline::storage::sqlite::quote_identifier;

/// Reads every row of one table from a SQLite database file
pub struct DatabaseTableSource {
    path: PathBuf,
    table: String,
}

impl DatabaseTableSource {
    pub fn new(path: impl AsRef<Path>, table: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table: table.into(),
        }
    }

    /// Names of the user tables in a database file
    pub fn list_tables(path: impl AsRef<Path>) -> Result<Vec<String>> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

pub(crate) fn read_table(conn: &Connection, table: &str) -> Result<Table> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_identifier(table)))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut result = Table::new(columns);
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            cells.push(cell_from_sql(row.get_ref(idx)?));
        }
        result.push_row(cells)?;
    }
    Ok(result)
}

fn cell_from_sql(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(v) => Cell::Integer(v),
        ValueRef::Real(v) => Cell::Float(v),
        ValueRef::Text(bytes) => Cell::text(String::from_utf8_lossy(bytes)),
        // no table we extract stores blobs
        ValueRef::Blob(_) => Cell::Null,
    }
}

#[async_trait]
impl TableSource for DatabaseTableSource {
    async fn fetch(&self) -> Result<Table> {
        let path = self.path.clone();
        let table = self.table.clone();

        let result = tokio::task::spawn_blocking(move || -> Result<Table> {
            let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
            read_table(&conn, &table)
        })
        .await
        .map_err(|e| EtlError::Source {
            source_name: self.describe(),
            message: format!("reader task failed: {}", e),
        })??;

        debug!(rows = result.len(), "Read {}", self.describe());
        Ok(result)
    }

    fn describe(&self) -> String {
        format!("database table '{}' in {}", self.table, self.path.display())
    }
}
