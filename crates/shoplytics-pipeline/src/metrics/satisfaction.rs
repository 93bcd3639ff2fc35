use std::collections::{BTreeMap, BTreeSet};

use shoplytics_core::metrics::{Analysis, SatisfactionMetrics};
use shoplytics_core::sales::Dimension;

use super::{mean, median, MetricsCalculator};

impl MetricsCalculator<'_> {
    /// Review score statistics, one `(order_id, score)` pair per order.
    ///
    /// Item and review fan-out in the sales view is collapsed before scoring.
    /// Rows without a score are ignored. Soft-fails instead of erroring.
    pub fn customer_satisfaction(&self) -> Analysis<SatisfactionMetrics> {
        if !self.sales.has(Dimension::ReviewScore) {
            return Analysis::unavailable("Review score column not found");
        }

        let pairs: BTreeSet<(&str, u8)> = self
            .sales
            .records()
            .iter()
            .filter_map(|r| r.review_score.map(|score| (r.order_id.as_str(), score)))
            .collect();
        if pairs.is_empty() {
            return Analysis::unavailable("No review scores in selection");
        }

        let scores: Vec<f64> = pairs.iter().map(|(_, s)| f64::from(*s)).collect();
        let total = pairs.len();

        let mut counts: BTreeMap<u8, usize> = (1..=5).map(|s| (s, 0)).collect();
        for (_, score) in &pairs {
            *counts.entry(*score).or_default() += 1;
        }
        let score_distribution = counts
            .into_iter()
            .map(|(score, n)| (score, n as f64 / total as f64))
            .collect();

        let high = pairs.iter().filter(|(_, s)| *s >= 4).count();

        Analysis::Ready(SatisfactionMetrics {
            avg_review_score: mean(&scores).unwrap_or_default(),
            median_review_score: median(&scores).unwrap_or_default(),
            total_reviews: total,
            score_distribution,
            high_satisfaction_pct: high as f64 / total as f64 * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{approx, view, view_with, Row};
    use super::*;
    use shoplytics_core::sales::Dimensions;

    #[test]
    fn items_of_one_order_count_as_one_review() {
        let sales = view(vec![
            Row::new("o1", 1, 10.0).score(5),
            Row::new("o1", 2, 10.0).score(5),
            Row::new("o2", 1, 10.0).score(2),
        ]);
        let metrics = MetricsCalculator::new(&sales).customer_satisfaction();
        let metrics = metrics.ready().expect("available");
        assert_eq!(metrics.total_reviews, 2);
        assert!(approx(metrics.avg_review_score, 3.5));
        assert!(approx(metrics.high_satisfaction_pct, 50.0));
        assert_eq!(metrics.score_distribution.len(), 5);
        assert!(approx(metrics.score_distribution[&5], 0.5));
        assert!(approx(metrics.score_distribution[&3], 0.0));
    }

    #[test]
    fn missing_score_dimension_soft_fails() {
        let sales = view_with(vec![Row::new("o1", 1, 10.0)], Dimensions::none());
        assert_eq!(
            MetricsCalculator::new(&sales).customer_satisfaction(),
            Analysis::unavailable("Review score column not found")
        );
    }

    #[test]
    fn unscored_rows_are_ignored() {
        let sales = view(vec![Row::new("o1", 1, 10.0), Row::new("o2", 1, 10.0).score(4)]);
        let metrics = MetricsCalculator::new(&sales).customer_satisfaction();
        let metrics = metrics.ready().expect("available");
        assert_eq!(metrics.total_reviews, 1);
        assert_eq!(metrics.median_review_score, 4.0);
    }

    #[test]
    fn no_scores_soft_fails() {
        let sales = view(vec![Row::new("o1", 1, 10.0)]);
        assert!(!MetricsCalculator::new(&sales)
            .customer_satisfaction()
            .is_ready());
    }
}
