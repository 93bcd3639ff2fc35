use std::collections::{BTreeMap, BTreeSet};

use shoplytics_core::metrics::{Analysis, DeliveryBand, DeliveryMetrics};
use shoplytics_core::sales::Dimension;

use super::{mean, median, MetricsCalculator};

impl MetricsCalculator<'_> {
    /// Delivery latency per order, bucketed into three speed bands.
    ///
    /// Deduplicated to `(order_id, delivery_days, score)` first; orders
    /// without a delivery date are dropped. Soft-fails instead of erroring.
    pub fn delivery_performance(&self) -> Analysis<DeliveryMetrics> {
        if !self.sales.has(Dimension::DeliveryDays) {
            return Analysis::unavailable("Delivery days column not found");
        }

        let orders: BTreeSet<(&str, i64, Option<u8>)> = self
            .sales
            .records()
            .iter()
            .filter_map(|r| {
                r.delivery_days
                    .map(|days| (r.order_id.as_str(), days, r.review_score))
            })
            .collect();
        if orders.is_empty() {
            return Analysis::unavailable("No delivered orders with delivery dates in selection");
        }

        let days: Vec<f64> = orders.iter().map(|(_, d, _)| *d as f64).collect();
        let total = orders.len() as f64;

        let mut band_counts: BTreeMap<DeliveryBand, usize> =
            DeliveryBand::ALL.iter().map(|b| (*b, 0)).collect();
        let mut band_scores: BTreeMap<DeliveryBand, Vec<f64>> = BTreeMap::new();
        for (_, d, score) in &orders {
            let band = DeliveryBand::for_days(*d);
            *band_counts.entry(band).or_default() += 1;
            if let Some(score) = score {
                band_scores.entry(band).or_default().push(f64::from(*score));
            }
        }

        Analysis::Ready(DeliveryMetrics {
            avg_delivery_days: mean(&days).unwrap_or_default(),
            median_delivery_days: median(&days).unwrap_or_default(),
            delivery_category_distribution: band_counts
                .into_iter()
                .map(|(band, n)| (band, n as f64 / total))
                .collect(),
            avg_review_by_delivery_speed: band_scores
                .into_iter()
                .filter_map(|(band, scores)| mean(&scores).map(|m| (band, m)))
                .collect(),
        })
    }
}
