//! Metrics engine over a sales view.
//!
//! Each submodule adds one family of metrics to [`MetricsCalculator`].

mod delivery;
mod performance;
mod report;
mod revenue;
mod satisfaction;
mod trends;

use std::collections::BTreeMap;

use shoplytics_core::sales::SalesView;

/// Computes metrics for one sales view.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCalculator<'a> {
    sales: &'a SalesView,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(sales: &'a SalesView) -> Self {
        Self { sales }
    }

    pub fn sales(&self) -> &'a SalesView {
        self.sales
    }
}

/// `(current - previous) / previous * 100`, absent when `previous ≤ 0`.
pub fn growth_pct(current: f64, previous: f64) -> Option<f64> {
    (previous > 0.0).then(|| (current - previous) / previous * 100.0)
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Middle value; the mean of the two middle values for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Revenue (`Σ price`) per order, keyed by `order_id`.
pub(crate) fn order_totals(sales: &SalesView) -> BTreeMap<&str, f64> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in sales.records() {
        *totals.entry(record.order_id.as_str()).or_insert(0.0) += record.price;
    }
    totals
}
