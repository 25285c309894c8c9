use async_trait::async_trait;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params_from_iter, Connection, ToSql};
use std::path::{Path, PathBuf};
use tracing::info;

use super::TableSink;
use crate::domain::{Cell, Table};
use crate::error::{EtlError, Result};

/// Writes cleaned tables into a SQLite database, replacing any existing table
pub struct SqliteTableSink {
    path: PathBuf,
}

impl SqliteTableSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Column type for the destination table, from the first non-null cell
fn column_affinity(table: &Table, column: usize) -> &'static str {
    let first = table
        .rows()
        .iter()
        .map(|row| &row[column])
        .find(|cell| !cell.is_null());
    match first {
        Some(Cell::Integer(_)) => "INTEGER",
        Some(Cell::Float(_)) => "REAL",
        _ => "TEXT",
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Cell::Null => ToSqlOutput::Owned(Value::Null),
            Cell::Float(v) if v.is_nan() => ToSqlOutput::Owned(Value::Null),
            Cell::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            Cell::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            Cell::Text(_) | Cell::Date(_) => ToSqlOutput::Owned(Value::Text(self.render().into_owned())),
        })
    }
}

pub(crate) fn replace_table(conn: &mut Connection, name: &str, table: &Table) -> Result<usize> {
    if table.columns().is_empty() {
        return Err(EtlError::Source {
            source_name: name.to_string(),
            message: "cannot load a table without columns".to_string(),
        });
    }

    let quoted = quote_identifier(name);
    let column_defs = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| format!("{} {}", quote_identifier(column), column_affinity(table, idx)))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; table.columns().len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", quoted), [])?;
    tx.execute(&format!("CREATE TABLE {} ({})", quoted, column_defs), [])?;
    {
        let mut insert = tx.prepare(&format!("INSERT INTO {} VALUES ({})", quoted, placeholders))?;
        for row in table.rows() {
            insert.execute(params_from_iter(row.iter()))?;
        }
    }
    tx.commit()?;
    Ok(table.len())
}

#[async_trait]
impl TableSink for SqliteTableSink {
    async fn load(&self, name: &str, table: &Table) -> Result<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let path = self.path.clone();
        let name_owned = name.to_string();
        let table_owned = table.clone();
        let written = tokio::task::spawn_blocking(move || -> Result<usize> {
            let mut conn = Connection::open(&path)?;
            replace_table(&mut conn, &name_owned, &table_owned)
        })
        .await
        .map_err(|e| EtlError::Source {
            source_name: name.to_string(),
            message: format!("writer task failed: {}", e),
        })??;

        info!(rows = written, "Loaded table '{}' into {}", name, self.path.display());
        Ok(written)
    }
}
