use std::collections::HashSet;

use shoplytics_core::metrics::{RevenueGrowth, RevenueMetrics};
use shoplytics_core::sales::SalesView;

use super::{growth_pct, mean, median, order_totals, MetricsCalculator};

struct Totals {
    revenue: f64,
    orders: usize,
    per_order: Vec<f64>,
    aov: Option<f64>,
}

fn totals(sales: &SalesView) -> Totals {
    let per_order: Vec<f64> = order_totals(sales).into_values().collect();
    Totals {
        revenue: sales.records().iter().map(|r| r.price).sum(),
        orders: distinct_orders(sales),
        aov: mean(&per_order),
        per_order,
    }
}

fn distinct_orders(sales: &SalesView) -> usize {
    sales
        .records()
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

impl MetricsCalculator<'_> {
    /// Revenue, order and basket metrics. Freight is not revenue.
    ///
    /// With a comparison view, growth is reported for revenue, order count
    /// and average order value.
    pub fn revenue_metrics(&self, comparison: Option<&SalesView>) -> RevenueMetrics {
        let current = totals(self.sales);
        let total_items = self.sales.len();

        let growth = comparison.map(|previous| {
            let previous = totals(previous);
            RevenueGrowth {
                revenue_growth_pct: growth_pct(current.revenue, previous.revenue),
                order_growth_pct: growth_pct(current.orders as f64, previous.orders as f64),
                aov_growth_pct: match (current.aov, previous.aov) {
                    (Some(now), Some(before)) => growth_pct(now, before),
                    _ => None,
                },
            }
        });

        RevenueMetrics {
            total_revenue: current.revenue,
            average_order_value: current.aov,
            median_order_value: median(&current.per_order),
            total_orders: current.orders,
            total_items,
            avg_items_per_order: (current.orders > 0)
                .then(|| total_items as f64 / current.orders as f64),
            growth,
        }
    }
}
