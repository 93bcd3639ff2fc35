use std::collections::{BTreeMap, HashSet};

use shoplytics_core::error::PipelineError;
use shoplytics_core::metrics::MonthlyTrend;
use shoplytics_core::sales::Dimension;

use super::{growth_pct, MetricsCalculator};

impl MetricsCalculator<'_> {
    /// Revenue and orders per month, ascending.
    ///
    /// Months without sales are absent rows, so growth compares against the
    /// preceding *present* month. Rows whose order did not join carry no
    /// month and are skipped.
    pub fn monthly_trends(&self) -> Result<Vec<MonthlyTrend>, PipelineError> {
        self.sales.require(Dimension::Month)?;

        let mut by_month: BTreeMap<u32, (f64, HashSet<&str>)> = BTreeMap::new();
        for record in self.sales.records() {
            let Some(month) = record.month else {
                continue;
            };
            let (revenue, orders) = by_month.entry(month).or_default();
            *revenue += record.price;
            orders.insert(record.order_id.as_str());
        }

        let mut trends: Vec<MonthlyTrend> = Vec::with_capacity(by_month.len());
        for (month, (revenue, orders)) in by_month {
            let orders = orders.len();
            let (revenue_growth_pct, orders_growth_pct) = match trends.last() {
                Some(prev) => (
                    growth_pct(revenue, prev.revenue),
                    growth_pct(orders as f64, prev.orders as f64),
                ),
                None => (None, None),
            };
            trends.push(MonthlyTrend {
                month,
                revenue,
                orders,
                revenue_growth_pct,
                orders_growth_pct,
                avg_order_value: revenue / orders as f64,
            });
        }
        Ok(trends)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{approx, view, view_with, Row};
    use super::*;
    use shoplytics_core::sales::Dimensions;

    #[test]
    fn growth_compares_against_previous_present_month() {
        let sales = view(vec![
            Row::new("o1", 1, 100.0).month(1),
            Row::new("o2", 1, 50.0).month(1),
            Row::new("o3", 1, 300.0).month(3),
        ]);
        let trends = MetricsCalculator::new(&sales).monthly_trends().expect("trends");
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].month, 1);
        assert_eq!(trends[0].orders, 2);
        assert_eq!(trends[0].revenue_growth_pct, None);
        assert!(approx(trends[0].avg_order_value, 75.0));
        assert_eq!(trends[1].month, 3);
        assert!(approx(trends[1].revenue_growth_pct.expect("growth"), 100.0));
        assert!(approx(trends[1].orders_growth_pct.expect("growth"), -50.0));
    }

    #[test]
    fn orders_are_distinct_within_a_month() {
        let sales = view(vec![
            Row::new("o1", 1, 10.0).month(4),
            Row::new("o1", 2, 15.0).month(4),
        ]);
        let trends = MetricsCalculator::new(&sales).monthly_trends().expect("trends");
        assert_eq!(trends[0].orders, 1);
        assert_eq!(trends[0].revenue, 25.0);
    }

    #[test]
    fn missing_month_dimension_is_an_error() {
        let sales = view_with(vec![Row::new("o1", 1, 10.0)], Dimensions::none());
        let err = MetricsCalculator::new(&sales).monthly_trends().unwrap_err();
        assert_eq!(err.to_string(), "Month column not found in sales data");
    }
}
