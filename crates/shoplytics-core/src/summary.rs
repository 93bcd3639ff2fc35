use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Loader-level statistics used to populate filter controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub total_orders: usize,
    pub date_range: DateRange,
    /// Ascending, distinct.
    pub years_available: Vec<i32>,
    pub order_statuses: BTreeMap<String, usize>,
    pub total_products: usize,
    /// Distinct non-null category names.
    pub product_categories: usize,
    pub total_customers: usize,
    /// Distinct non-null customer states.
    pub states: usize,
}

/// Purchase timestamp range; both ends `None` for an empty orders table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}
