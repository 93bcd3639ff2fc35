//! The denormalised sales view: one record per order item surviving filters.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_STATUS;
use crate::error::PipelineError;

/// A column of the sales view that an aggregation may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Month,
    Category,
    State,
    ReviewScore,
    DeliveryDays,
}

impl Dimension {
    fn bit(self) -> u8 {
        match self {
            Dimension::Month => 1,
            Dimension::Category => 1 << 1,
            Dimension::State => 1 << 2,
            Dimension::ReviewScore => 1 << 3,
            Dimension::DeliveryDays => 1 << 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Month => "Month",
            Dimension::Category => "Product category",
            Dimension::State => "Customer state",
            Dimension::ReviewScore => "Review score",
            Dimension::DeliveryDays => "Delivery days",
        }
    }
}

/// Set of dimensions present on a table or sales view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions(u8);

impl Dimensions {
    pub fn none() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Self::of(&[
            Dimension::Month,
            Dimension::Category,
            Dimension::State,
            Dimension::ReviewScore,
            Dimension::DeliveryDays,
        ])
    }

    pub fn of(dims: &[Dimension]) -> Self {
        dims.iter().fold(Self::none(), |set, d| set.with(*d))
    }

    #[must_use]
    pub fn with(self, dim: Dimension) -> Self {
        Self(self.0 | dim.bit())
    }

    #[must_use]
    pub fn without(self, dim: Dimension) -> Self {
        Self(self.0 & !dim.bit())
    }

    #[must_use]
    pub fn union(self, other: Dimensions) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(&self, dim: Dimension) -> bool {
        self.0 & dim.bit() != 0
    }
}

/// Row filters applied while building a sales view.
///
/// Each filter is an independent predicate; `None` disables it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SalesFilter {
    pub year: Option<i32>,
    /// 1–12.
    pub month: Option<u32>,
    /// Exact, case-sensitive match against `order_status`.
    pub status: Option<String>,
}

impl Default for SalesFilter {
    fn default() -> Self {
        Self {
            year: None,
            month: None,
            status: Some(DEFAULT_STATUS.to_string()),
        }
    }
}

impl SalesFilter {
    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    /// Same month/status filters, different year.
    #[must_use]
    pub fn with_year(&self, year: i32) -> Self {
        Self {
            year: Some(year),
            ..self.clone()
        }
    }
}

/// One order item joined with its order, product, customer and review.
///
/// Dimension attributes are `None` when the left join found no match; the
/// record itself is never dropped for a missing dimension row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_item_id: u32,
    pub product_id: String,
    pub price: f64,
    pub freight_value: f64,
    pub customer_id: Option<String>,
    pub order_status: Option<String>,
    pub purchase_timestamp: Option<NaiveDateTime>,
    pub delivered_customer_date: Option<NaiveDateTime>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category_name: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub review_score: Option<u8>,
    /// Whole days from purchase to delivery, floored.
    pub delivery_days: Option<i64>,
}

impl SalesRecord {
    /// A bare item row with every joined attribute still unset.
    pub fn item(
        order_id: &str,
        order_item_id: u32,
        product_id: &str,
        price: f64,
        freight_value: f64,
    ) -> Self {
        Self {
            order_id: order_id.to_string(),
            order_item_id,
            product_id: product_id.to_string(),
            price,
            freight_value,
            customer_id: None,
            order_status: None,
            purchase_timestamp: None,
            delivered_customer_date: None,
            year: None,
            month: None,
            category_name: None,
            state: None,
            city: None,
            review_score: None,
            delivery_days: None,
        }
    }
}

/// A sales record set together with the dimensions it carries.
#[derive(Debug, Clone, Default)]
pub struct SalesView {
    records: Vec<SalesRecord>,
    dimensions: Dimensions,
}

impl SalesView {
    pub fn new(records: Vec<SalesRecord>, dimensions: Dimensions) -> Self {
        Self {
            records,
            dimensions,
        }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn has(&self, dim: Dimension) -> bool {
        self.dimensions.contains(dim)
    }

    /// `MissingDimension` unless the view carries `dim`.
    pub fn require(&self, dim: Dimension) -> Result<(), PipelineError> {
        if self.has(dim) {
            Ok(())
        } else {
            Err(PipelineError::MissingDimension(dim))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_set_operations() {
        let dims = Dimensions::of(&[Dimension::Month, Dimension::State]);
        assert!(dims.contains(Dimension::Month));
        assert!(!dims.contains(Dimension::Category));
        assert!(!dims.without(Dimension::Month).contains(Dimension::Month));
        assert!(dims
            .union(Dimensions::of(&[Dimension::Category]))
            .contains(Dimension::Category));
    }

    #[test]
    fn default_filter_keeps_delivered_only() {
        let filter = SalesFilter::default();
        assert_eq!(filter.status.as_deref(), Some("delivered"));
        assert_eq!(filter.year, None);
        assert_eq!(filter.with_year(2022).year, Some(2022));
    }

    #[test]
    fn require_reports_missing_dimension() {
        let view = SalesView::new(Vec::new(), Dimensions::of(&[Dimension::Month]));
        assert!(view.require(Dimension::Month).is_ok());
        assert!(matches!(
            view.require(Dimension::State),
            Err(PipelineError::MissingDimension(Dimension::State))
        ));
    }
}
