// Data pipeline: extraction sources, cleaning, and load sinks

pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod storage;

// Re-export key types and functions from each stage
pub use orchestrator::{Job, Orchestrator, RunSummary};
pub use processing::DataCleaner;
