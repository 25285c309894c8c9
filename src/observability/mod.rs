// Observability: metrics recorded across extract, clean and load

pub mod metrics;

pub use metrics::{init, MetricName};
