//! Assemble the dashboard payload for one year/month/status selection.

use shoplytics_core::dashboard::{DashboardRequest, DashboardView};
use shoplytics_core::metrics::{Analysis, MonthlyTrend};
use shoplytics_core::sales::SalesFilter;

use crate::metrics::{growth_pct, mean, MetricsCalculator};
use crate::Dataset;

/// Requested year, else `preferred` when it has data, else the latest year.
pub fn resolve_year(requested: Option<i32>, preferred: i32, available: &[i32]) -> Option<i32> {
    requested.or_else(|| {
        if available.contains(&preferred) {
            Some(preferred)
        } else {
            available.last().copied()
        }
    })
}

fn avg_growth(trends: &[MonthlyTrend]) -> Option<f64> {
    let growth: Vec<f64> = trends.iter().filter_map(|t| t.revenue_growth_pct).collect();
    mean(&growth)
}

pub fn build_dashboard(
    dataset: &Dataset,
    request: &DashboardRequest,
    preferred_year: i32,
    top_categories: usize,
) -> DashboardView {
    let years = dataset.years_available();
    let selected_year = resolve_year(request.year, preferred_year, &years);
    let comparison_year = selected_year
        .map(|y| y - 1)
        .filter(|prev| years.contains(prev));

    let filter = SalesFilter {
        year: selected_year,
        month: request.month,
        status: request.status.clone(),
    };
    let current = dataset.sales(&filter);
    let previous = comparison_year.map(|y| dataset.sales(&filter.with_year(y)));

    let calc = MetricsCalculator::new(&current);
    // Revenue growth compares against any comparison view, even an empty one;
    // trends and delivery only against one that has rows.
    let previous_calc = previous
        .as_ref()
        .filter(|view| !view.is_empty())
        .map(MetricsCalculator::new);

    let full_year = request.month.is_none();
    let monthly_trends = full_year.then(|| calc.monthly_trends().ok()).flatten();
    let previous_monthly_trends = full_year
        .then(|| previous_calc.and_then(|p| p.monthly_trends().ok()))
        .flatten();

    let delivery_performance = calc.delivery_performance();
    let delivery_time_trend_pct = match (
        delivery_performance.ready(),
        previous_calc.map(|p| p.delivery_performance()),
    ) {
        (Some(now), Some(Analysis::Ready(before))) => {
            growth_pct(now.avg_delivery_days, before.avg_delivery_days)
        }
        _ => None,
    };

    let top_categories = match calc.product_performance() {
        Ok(mut rows) => {
            rows.truncate(top_categories);
            Analysis::Ready(rows)
        }
        Err(err) => Analysis::unavailable(err.to_string()),
    };
    let geographic_performance = match calc.geographic_performance() {
        Ok(rows) => Analysis::Ready(rows),
        Err(err) => Analysis::unavailable(err.to_string()),
    };

    DashboardView {
        selected_year,
        selected_month: request.month,
        comparison_year,
        revenue_metrics: calc.revenue_metrics(previous.as_ref()),
        avg_monthly_growth_pct: monthly_trends.as_deref().and_then(avg_growth),
        monthly_trends,
        previous_monthly_trends,
        top_categories,
        geographic_performance,
        customer_satisfaction: calc.customer_satisfaction(),
        delivery_performance,
        delivery_time_trend_pct,
    }
}
