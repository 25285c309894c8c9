// Domain data shapes shared across layers

mod record_kind;
mod table;

pub use record_kind::RecordKind;
pub use table::{Cell, Table};
