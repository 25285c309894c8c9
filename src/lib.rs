pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;

// Domain data shapes shared across layers
pub mod domain;

pub use domain::{Cell, RecordKind, Table};
pub use error::{EtlError, Result};
pub use pipeline::processing::validate::ReferenceTables;
pub use pipeline::DataCleaner;
