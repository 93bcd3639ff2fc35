pub mod dashboard;
pub mod filters;
pub mod health;
pub mod metrics;
pub mod not_found;
pub mod report;
pub mod summary;
