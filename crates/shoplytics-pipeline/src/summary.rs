use std::collections::{BTreeMap, BTreeSet};

use shoplytics_core::summary::{DataSummary, DateRange};
use shoplytics_core::tables::CleanedTables;

/// Dataset-wide statistics, independent of any sales filter.
pub fn data_summary(tables: &CleanedTables) -> DataSummary {
    let orders = &tables.orders.rows;

    let mut order_statuses: BTreeMap<String, usize> = BTreeMap::new();
    for order in orders {
        *order_statuses.entry(order.order_status.clone()).or_default() += 1;
    }

    let years: BTreeSet<i32> = orders.iter().map(|o| o.year).collect();

    let categories: BTreeSet<&str> = tables
        .products
        .rows
        .iter()
        .filter_map(|p| p.category_name.as_deref())
        .collect();
    let states: BTreeSet<&str> = tables
        .customers
        .rows
        .iter()
        .filter_map(|c| c.state.as_deref())
        .collect();

    DataSummary {
        total_orders: orders.len(),
        date_range: DateRange {
            start: orders.iter().map(|o| o.purchase_timestamp).min(),
            end: orders.iter().map(|o| o.purchase_timestamp).max(),
        },
        years_available: years.into_iter().collect(),
        order_statuses,
        total_products: tables.products.len(),
        product_categories: categories.len(),
        total_customers: tables.customers.len(),
        states: states.len(),
    }
}
