//! Metric structures handed to the presentation layer.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Result of an analysis that may be unavailable for a given sales view.
///
/// Serialises as the bare payload when ready and as `{ "error": reason }`
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Analysis<T> {
    Ready(T),
    Unavailable { error: String },
}

impl<T> Analysis<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Analysis::Unavailable {
            error: reason.into(),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Analysis::Ready(value) => Some(value),
            Analysis::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Analysis::Ready(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueMetrics {
    pub total_revenue: f64,
    pub average_order_value: Option<f64>,
    pub median_order_value: Option<f64>,
    pub total_orders: usize,
    pub total_items: usize,
    pub avg_items_per_order: Option<f64>,
    /// Present only when a comparison view was supplied.
    #[serde(flatten)]
    pub growth: Option<RevenueGrowth>,
}

/// Period-over-period growth; each value is `None` when its baseline is ≤ 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueGrowth {
    pub revenue_growth_pct: Option<f64>,
    pub order_growth_pct: Option<f64>,
    pub aov_growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub month: u32,
    pub revenue: f64,
    pub orders: usize,
    pub revenue_growth_pct: Option<f64>,
    pub orders_growth_pct: Option<f64>,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub revenue: f64,
    pub orders: usize,
    pub items_sold: usize,
    pub revenue_share_pct: f64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatePerformance {
    pub state: String,
    pub revenue: f64,
    pub orders: usize,
    pub customers: usize,
    pub revenue_share_pct: f64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionMetrics {
    pub avg_review_score: f64,
    pub median_review_score: f64,
    pub total_reviews: usize,
    /// Share of reviews per score 1–5 (fractions summing to 1).
    pub score_distribution: BTreeMap<u8, f64>,
    pub high_satisfaction_pct: f64,
}

/// Delivery speed band. `days ≤ 3`, `3 < days ≤ 7`, `days > 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeliveryBand {
    UpToThreeDays,
    FourToSevenDays,
    EightPlusDays,
}

impl DeliveryBand {
    pub const ALL: [DeliveryBand; 3] = [
        DeliveryBand::UpToThreeDays,
        DeliveryBand::FourToSevenDays,
        DeliveryBand::EightPlusDays,
    ];

    pub fn for_days(days: i64) -> Self {
        if days <= 3 {
            DeliveryBand::UpToThreeDays
        } else if days <= 7 {
            DeliveryBand::FourToSevenDays
        } else {
            DeliveryBand::EightPlusDays
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryBand::UpToThreeDays => "1-3 days",
            DeliveryBand::FourToSevenDays => "4-7 days",
            DeliveryBand::EightPlusDays => "8+ days",
        }
    }
}

impl Serialize for DeliveryBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryMetrics {
    pub avg_delivery_days: f64,
    pub median_delivery_days: f64,
    /// Share of orders per band, all three bands present.
    pub delivery_category_distribution: BTreeMap<DeliveryBand, f64>,
    /// Mean review score per band; bands without scored orders are omitted.
    pub avg_review_by_delivery_speed: BTreeMap<DeliveryBand, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveReport {
    pub revenue_metrics: RevenueMetrics,
    pub monthly_trends: Analysis<Vec<MonthlyTrend>>,
    pub product_performance: Analysis<Vec<CategoryPerformance>>,
    pub geographic_performance: Analysis<Vec<StatePerformance>>,
    pub customer_satisfaction: Analysis<SatisfactionMetrics>,
    pub delivery_performance: Analysis<DeliveryMetrics>,
}
