use shoplytics_core::error::PipelineError;
use shoplytics_core::metrics::{Analysis, ComprehensiveReport};
use shoplytics_core::sales::SalesView;
use tracing::warn;

use super::MetricsCalculator;

/// Render a failed section as an inline `{ "error": ... }` marker.
fn recover<T>(section: &'static str, result: Result<T, PipelineError>) -> Analysis<T> {
    match result {
        Ok(value) => Analysis::Ready(value),
        Err(err) => {
            warn!(section, error = %err, "Report section unavailable");
            Analysis::unavailable(err.to_string())
        }
    }
}

impl MetricsCalculator<'_> {
    /// Every metric family at once. A dataset missing one dimension still
    /// yields a partial report with inline error markers.
    pub fn comprehensive_report(&self, comparison: Option<&SalesView>) -> ComprehensiveReport {
        ComprehensiveReport {
            revenue_metrics: self.revenue_metrics(comparison),
            monthly_trends: recover("monthly_trends", self.monthly_trends()),
            product_performance: recover("product_performance", self.product_performance()),
            geographic_performance: recover(
                "geographic_performance",
                self.geographic_performance(),
            ),
            customer_satisfaction: self.customer_satisfaction(),
            delivery_performance: self.delivery_performance(),
        }
    }
}
