// Pipeline processing: predicates, unit and date normalization, row filters and table cleaners

pub mod cleaners;
pub mod filter;
pub mod normalize;
pub mod validate;

// Re-export key types and functions
pub use cleaners::{CleaningReport, CleaningSettings, DataCleaner, TableCleaner};
