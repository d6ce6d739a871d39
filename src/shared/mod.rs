/// Shared utilities used across all layers
///
/// - `metrics`: process-wide Prometheus metrics

pub mod metrics;

pub use metrics::METRICS;
