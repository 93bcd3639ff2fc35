pub mod cleaner;
pub mod dashboard;
pub mod dataset;
pub mod loader;
pub mod metrics;
pub mod sales_view;
pub mod summary;

pub use dataset::Dataset;
pub use metrics::MetricsCalculator;

/// Re-export the core crate so consumers can name domain types through the
/// pipeline without an extra dependency.
pub use shoplytics_core as core;
