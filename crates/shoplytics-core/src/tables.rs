//! Raw and cleaned table types.
//!
//! Raw tables are untyped string grids straight from the ingestion layer.
//! Cleaned tables are typed records produced by the cleaner. The two are
//! distinct types, so a cleaned table can never be cleaned a second time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::sales::Dimensions;

/// The five logical datasets every source must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetName {
    Orders,
    OrderItems,
    Products,
    Customers,
    Reviews,
}

impl DatasetName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Orders => "orders",
            DatasetName::OrderItems => "order_items",
            DatasetName::Products => "products",
            DatasetName::Customers => "customers",
            DatasetName::Reviews => "reviews",
        }
    }

    /// File name of the dataset inside a source directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetName::Orders => "orders_dataset.csv",
            DatasetName::OrderItems => "order_items_dataset.csv",
            DatasetName::Products => "products_dataset.csv",
            DatasetName::Customers => "customers_dataset.csv",
            DatasetName::Reviews => "order_reviews_dataset.csv",
        }
    }
}

impl std::fmt::Display for DatasetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An untyped table: a header row plus string cells.
///
/// Columns are looked up by header name when a stage needs them, never
/// eagerly on load.
#[derive(Debug, Clone)]
pub struct RawTable {
    dataset: DatasetName,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(dataset: DatasetName, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            dataset,
            headers,
            rows,
        }
    }

    pub fn dataset(&self) -> DatasetName {
        self.dataset
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a required column, or a `SchemaError` naming table and column.
    pub fn column(&self, name: &str) -> Result<usize, PipelineError> {
        self.optional_column(name)
            .ok_or_else(|| PipelineError::missing_column(self.dataset.as_str(), name))
    }

    pub fn optional_column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(|cells| RawRow { cells })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [String],
}

impl<'a> RawRow<'a> {
    /// Cell at `column`; rows shorter than the header read as empty.
    pub fn get(&self, column: usize) -> &'a str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    /// Cell at an optional column, `None` when the column or the value is empty.
    pub fn get_opt(&self, column: Option<usize>) -> Option<&'a str> {
        column.map(|c| self.get(c)).filter(|v| !v.is_empty())
    }
}

/// All five raw tables of one source.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub orders: RawTable,
    pub order_items: RawTable,
    pub products: RawTable,
    pub customers: RawTable,
    pub reviews: RawTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub purchase_timestamp: NaiveDateTime,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_carrier_date: Option<NaiveDateTime>,
    pub delivered_customer_date: Option<NaiveDateTime>,
    pub estimated_delivery_date: Option<NaiveDateTime>,
    /// Always derived from `purchase_timestamp`.
    pub year: i32,
    /// 1-indexed, always derived from `purchase_timestamp`.
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub order_id: String,
    pub order_item_id: u32,
    pub product_id: String,
    pub price: f64,
    pub freight_value: f64,
    /// `price + freight_value`.
    pub total_item_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub product_id: String,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub customer_id: String,
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub review_id: Option<String>,
    pub order_id: String,
    /// 1–5; `None` for a review row with an empty score cell.
    pub score: Option<u8>,
    pub creation_date: Option<NaiveDateTime>,
    pub answer_timestamp: Option<NaiveDateTime>,
}

/// A cleaned table and the sales dimensions its columns make available.
#[derive(Debug, Clone)]
pub struct Table<T> {
    pub rows: Vec<T>,
    pub provides: Dimensions,
}

impl<T> Table<T> {
    pub fn new(rows: Vec<T>, provides: Dimensions) -> Self {
        Self { rows, provides }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CleanedTables {
    pub orders: Table<Order>,
    pub order_items: Table<OrderItem>,
    pub products: Table<Product>,
    pub customers: Table<Customer>,
    pub reviews: Table<Review>,
}

impl CleanedTables {
    /// Union of the dimensions every table contributes to a sales view.
    pub fn dimensions(&self) -> Dimensions {
        self.orders
            .provides
            .union(self.order_items.provides)
            .union(self.products.provides)
            .union(self.customers.provides)
            .union(self.reviews.provides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            DatasetName::Products,
            vec!["product_id".to_string(), "product_category_name".to_string()],
            vec![
                vec!["p1".to_string(), "toys".to_string()],
                vec!["p2".to_string()],
            ],
        )
    }

    #[test]
    fn required_column_missing_is_schema_error() {
        let err = table().column("product_weight_g").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Schema { table: "products", ref column, .. } if column == "product_weight_g"
        ));
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let t = table();
        let category = t.optional_column("product_category_name");
        let cells: Vec<Option<&str>> = t.rows().map(|r| r.get_opt(category)).collect();
        assert_eq!(cells, vec![Some("toys"), None]);
    }

    #[test]
    fn dataset_file_names_follow_export_layout() {
        assert_eq!(DatasetName::Reviews.file_name(), "order_reviews_dataset.csv");
        assert_eq!(DatasetName::OrderItems.as_str(), "order_items");
    }
}
