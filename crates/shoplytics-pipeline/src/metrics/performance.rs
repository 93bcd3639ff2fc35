use std::collections::{BTreeMap, HashSet};

use shoplytics_core::error::PipelineError;
use shoplytics_core::metrics::{CategoryPerformance, StatePerformance};
use shoplytics_core::sales::{Dimension, SalesRecord};

use super::MetricsCalculator;

#[derive(Default)]
struct GroupTotals<'a> {
    revenue: f64,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
    items: usize,
}

/// Group rows by a nullable key. Null keys are left out of every group.
/// Groups come back in ascending key order.
fn group_by<'a>(
    records: &'a [SalesRecord],
    key: impl Fn(&'a SalesRecord) -> Option<&'a str>,
) -> BTreeMap<&'a str, GroupTotals<'a>> {
    let mut groups: BTreeMap<&str, GroupTotals> = BTreeMap::new();
    for record in records {
        let Some(k) = key(record) else {
            continue;
        };
        let group = groups.entry(k).or_default();
        group.revenue += record.price;
        group.orders.insert(record.order_id.as_str());
        if let Some(customer) = record.customer_id.as_deref() {
            group.customers.insert(customer);
        }
        group.items += 1;
    }
    groups
}

fn share_pct(revenue: f64, total: f64) -> f64 {
    if total > 0.0 {
        revenue / total * 100.0
    } else {
        0.0
    }
}

impl MetricsCalculator<'_> {
    /// Per-category revenue, sorted by revenue descending.
    pub fn product_performance(&self) -> Result<Vec<CategoryPerformance>, PipelineError> {
        self.sales.require(Dimension::Category)?;

        let groups = group_by(self.sales.records(), |r| r.category_name.as_deref());
        let total: f64 = groups.values().map(|g| g.revenue).sum();

        let mut rows: Vec<CategoryPerformance> = groups
            .into_iter()
            .map(|(category, g)| CategoryPerformance {
                category: category.to_string(),
                revenue: g.revenue,
                orders: g.orders.len(),
                items_sold: g.items,
                revenue_share_pct: share_pct(g.revenue, total),
                avg_order_value: g.revenue / g.orders.len() as f64,
            })
            .collect();
        // Stable: ties keep ascending category order.
        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        Ok(rows)
    }

    /// Per-state revenue and customer reach, sorted by revenue descending.
    pub fn geographic_performance(&self) -> Result<Vec<StatePerformance>, PipelineError> {
        self.sales.require(Dimension::State)?;

        let groups = group_by(self.sales.records(), |r| r.state.as_deref());
        let total: f64 = groups.values().map(|g| g.revenue).sum();

        let mut rows: Vec<StatePerformance> = groups
            .into_iter()
            .map(|(state, g)| StatePerformance {
                state: state.to_string(),
                revenue: g.revenue,
                orders: g.orders.len(),
                customers: g.customers.len(),
                revenue_share_pct: share_pct(g.revenue, total),
                avg_order_value: g.revenue / g.orders.len() as f64,
            })
            .collect();
        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{approx, view, view_with, Row};
    use super::*;
    use shoplytics_core::sales::Dimensions;

    #[test]
    fn categories_sorted_by_revenue_with_shares() {
        let sales = view(vec![
            Row::new("o1", 1, 30.0).category("books"),
            Row::new("o1", 2, 50.0).category("toys"),
            Row::new("o2", 1, 20.0).category("toys"),
            Row::new("o3", 1, 99.0),
        ]);
        let rows = MetricsCalculator::new(&sales)
            .product_performance()
            .expect("categories");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "toys");
        assert_eq!(rows[0].orders, 2);
        assert_eq!(rows[0].items_sold, 2);
        assert!(approx(rows[0].revenue_share_pct, 70.0));
        assert!(approx(rows[0].avg_order_value, 35.0));
        let share_sum: f64 = rows.iter().map(|r| r.revenue_share_pct).sum();
        assert!(approx(share_sum, 100.0));
    }

    #[test]
    fn revenue_ties_keep_category_order() {
        let sales = view(vec![
            Row::new("o1", 1, 10.0).category("zeta"),
            Row::new("o2", 1, 10.0).category("alpha"),
        ]);
        let rows = MetricsCalculator::new(&sales)
            .product_performance()
            .expect("categories");
        let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn states_count_distinct_customers() {
        let sales = view(vec![
            Row::new("o1", 1, 10.0).state("SP").customer("c1"),
            Row::new("o2", 1, 30.0).state("SP").customer("c1"),
            Row::new("o3", 1, 60.0).state("RJ").customer("c2"),
        ]);
        let rows = MetricsCalculator::new(&sales)
            .geographic_performance()
            .expect("states");
        assert_eq!(rows[0].state, "RJ");
        assert_eq!(rows[1].state, "SP");
        assert_eq!(rows[1].orders, 2);
        assert_eq!(rows[1].customers, 1);
        assert!(approx(rows[1].revenue_share_pct, 40.0));
        let share_sum: f64 = rows.iter().map(|r| r.revenue_share_pct).sum();
        assert!(approx(share_sum, 100.0));
    }

    #[test]
    fn missing_dimensions_are_errors() {
        let sales = view_with(vec![Row::new("o1", 1, 10.0)], Dimensions::none());
        let calc = MetricsCalculator::new(&sales);
        assert!(matches!(
            calc.product_performance(),
            Err(PipelineError::MissingDimension(Dimension::Category))
        ));
        assert!(matches!(
            calc.geographic_performance(),
            Err(PipelineError::MissingDimension(Dimension::State))
        ));
    }
}
