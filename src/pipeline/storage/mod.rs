//! Load collaborators: where cleaned tables end up.

use async_trait::async_trait;

use crate::domain::Table;
use crate::error::Result;

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemorySink;
pub use sqlite::SqliteTableSink;

#[async_trait]
pub trait TableSink: Send + Sync {
    /// Replace the destination table `name` with `table`. Returns rows written.
    async fn load(&self, name: &str, table: &Table) -> Result<usize>;
}
