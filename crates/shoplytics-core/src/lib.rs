pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod sales;
pub mod summary;
pub mod tables;
