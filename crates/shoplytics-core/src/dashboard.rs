use serde::Serialize;

use crate::metrics::{
    Analysis, CategoryPerformance, DeliveryMetrics, MonthlyTrend, RevenueMetrics,
    SatisfactionMetrics, StatePerformance,
};

/// Selection driving one dashboard render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardRequest {
    /// `None` picks the default year (or the latest available one).
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub status: Option<String>,
}

/// Everything the dashboard page renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selected_year: Option<i32>,
    pub selected_month: Option<u32>,
    /// `selected_year - 1`, only when that year has data.
    pub comparison_year: Option<i32>,
    pub revenue_metrics: RevenueMetrics,
    /// Mean month-over-month revenue growth across the selected year.
    pub avg_monthly_growth_pct: Option<f64>,
    /// Full-year selections only.
    pub monthly_trends: Option<Vec<MonthlyTrend>>,
    pub previous_monthly_trends: Option<Vec<MonthlyTrend>>,
    pub top_categories: Analysis<Vec<CategoryPerformance>>,
    pub geographic_performance: Analysis<Vec<StatePerformance>>,
    pub customer_satisfaction: Analysis<SatisfactionMetrics>,
    pub delivery_performance: Analysis<DeliveryMetrics>,
    /// Change in average delivery days versus the comparison year.
    pub delivery_time_trend_pct: Option<f64>,
}
