//! Join the cleaned tables into one sales view.
//!
//! Every join is a left join: a hash index is built over the right-hand
//! table and probed once per left row. A miss keeps the row with null
//! attributes; multiple matches fan the row out, one copy per match.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use shoplytics_core::sales::{SalesFilter, SalesRecord, SalesView};
use shoplytics_core::tables::CleanedTables;

fn index_by<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
) -> HashMap<&'a str, Vec<&'a T>> {
    let mut index: HashMap<&str, Vec<&T>> = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(row)).or_default().push(row);
    }
    index
}

fn left_join<R>(
    base: Vec<SalesRecord>,
    index: &HashMap<&str, Vec<&R>>,
    key: impl Fn(&SalesRecord) -> Option<&str>,
    fill: impl Fn(&mut SalesRecord, &R),
) -> Vec<SalesRecord> {
    let mut joined = Vec::with_capacity(base.len());
    for mut record in base {
        let matches = key(&record)
            .and_then(|k| index.get(k))
            .map(Vec::as_slice)
            .unwrap_or_default();
        match matches {
            [] => joined.push(record),
            [only] => {
                fill(&mut record, only);
                joined.push(record);
            }
            many => {
                for right in many {
                    let mut copy = record.clone();
                    fill(&mut copy, right);
                    joined.push(copy);
                }
            }
        }
    }
    joined
}

fn passes(record: &SalesRecord, filter: &SalesFilter) -> bool {
    if let Some(status) = filter.status.as_deref() {
        if record.order_status.as_deref() != Some(status) {
            return false;
        }
    }
    if filter.year.is_some() && record.year != filter.year {
        return false;
    }
    if filter.month.is_some() && record.month != filter.month {
        return false;
    }
    true
}

/// Whole days between two timestamps, floored.
pub fn days_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_seconds().div_euclid(86_400)
}

/// Build the denormalised sales view for one filter combination.
///
/// Rows come out in order-item order, with join fan-out kept adjacent.
pub fn build_sales(tables: &CleanedTables, filter: &SalesFilter) -> SalesView {
    let base: Vec<SalesRecord> = tables
        .order_items
        .rows
        .iter()
        .map(|item| {
            SalesRecord::item(
                &item.order_id,
                item.order_item_id,
                &item.product_id,
                item.price,
                item.freight_value,
            )
        })
        .collect();

    let orders = index_by(&tables.orders.rows, |o| o.order_id.as_str());
    let mut sales = left_join(
        base,
        &orders,
        |r| Some(r.order_id.as_str()),
        |r, order| {
            r.customer_id = Some(order.customer_id.clone());
            r.order_status = Some(order.order_status.clone());
            r.purchase_timestamp = Some(order.purchase_timestamp);
            r.delivered_customer_date = order.delivered_customer_date;
            r.year = Some(order.year);
            r.month = Some(order.month);
        },
    );

    sales.retain(|r| passes(r, filter));

    let products = index_by(&tables.products.rows, |p| p.product_id.as_str());
    sales = left_join(
        sales,
        &products,
        |r| Some(r.product_id.as_str()),
        |r, product| r.category_name = product.category_name.clone(),
    );

    let customers = index_by(&tables.customers.rows, |c| c.customer_id.as_str());
    sales = left_join(
        sales,
        &customers,
        |r| r.customer_id.as_deref(),
        |r, customer| {
            r.state = customer.state.clone();
            r.city = customer.city.clone();
        },
    );

    let reviews = index_by(&tables.reviews.rows, |rv| rv.order_id.as_str());
    sales = left_join(
        sales,
        &reviews,
        |r| Some(r.order_id.as_str()),
        |r, review| r.review_score = review.score,
    );

    for record in &mut sales {
        record.delivery_days = match (record.purchase_timestamp, record.delivered_customer_date) {
            (Some(purchased), Some(delivered)) => Some(days_between(purchased, delivered)),
            _ => None,
        };
    }

    debug!(
        rows = sales.len(),
        year = ?filter.year,
        month = ?filter.month,
        status = ?filter.status,
        "Sales view built"
    );
    SalesView::new(sales, tables.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shoplytics_core::sales::{Dimension, Dimensions};
    use shoplytics_core::tables::{Customer, Order, OrderItem, Product, Review, Table};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid timestamp")
    }

    fn order(id: &str, customer: &str, status: &str, purchased: NaiveDateTime) -> Order {
        Order {
            order_id: id.to_string(),
            customer_id: customer.to_string(),
            order_status: status.to_string(),
            purchase_timestamp: purchased,
            approved_at: None,
            delivered_carrier_date: None,
            delivered_customer_date: None,
            estimated_delivery_date: None,
            year: chrono::Datelike::year(&purchased),
            month: chrono::Datelike::month(&purchased),
        }
    }

    fn item(order_id: &str, item_id: u32, product_id: &str, price: f64) -> OrderItem {
        OrderItem {
            order_id: order_id.to_string(),
            order_item_id: item_id,
            product_id: product_id.to_string(),
            price,
            freight_value: 1.0,
            total_item_value: price + 1.0,
        }
    }

    fn review(order_id: &str, score: u8) -> Review {
        Review {
            review_id: None,
            order_id: order_id.to_string(),
            score: Some(score),
            creation_date: None,
            answer_timestamp: None,
        }
    }

    fn tables() -> CleanedTables {
        let mut delivered = order("o1", "c1", "delivered", ts(2023, 1, 5, 10));
        delivered.delivered_customer_date = Some(ts(2023, 1, 9, 9));
        CleanedTables {
            orders: Table::new(
                vec![
                    delivered,
                    order("o2", "c2", "shipped", ts(2023, 2, 1, 8)),
                    order("o3", "c_missing", "delivered", ts(2022, 3, 1, 8)),
                ],
                Dimensions::of(&[Dimension::Month, Dimension::DeliveryDays]),
            ),
            order_items: Table::new(
                vec![
                    item("o1", 1, "p1", 100.0),
                    item("o1", 2, "p_missing", 20.0),
                    item("o2", 1, "p1", 50.0),
                    item("o3", 1, "p1", 30.0),
                    item("o_orphan", 1, "p1", 5.0),
                ],
                Dimensions::none(),
            ),
            products: Table::new(
                vec![Product {
                    product_id: "p1".to_string(),
                    category_name: Some("toys".to_string()),
                }],
                Dimensions::of(&[Dimension::Category]),
            ),
            customers: Table::new(
                vec![
                    Customer {
                        customer_id: "c1".to_string(),
                        state: Some("SP".to_string()),
                        city: Some("sao paulo".to_string()),
                    },
                    Customer {
                        customer_id: "c2".to_string(),
                        state: Some("RJ".to_string()),
                        city: None,
                    },
                ],
                Dimensions::of(&[Dimension::State]),
            ),
            reviews: Table::new(
                vec![review("o1", 5), review("o1", 3)],
                Dimensions::of(&[Dimension::ReviewScore]),
            ),
        }
    }

    #[test]
    fn missing_product_keeps_row_with_null_category() {
        let view = build_sales(&tables(), &SalesFilter::for_year(2023));
        let orphan: Vec<&SalesRecord> = view
            .records()
            .iter()
            .filter(|r| r.product_id == "p_missing")
            .collect();
        assert!(!orphan.is_empty());
        assert!(orphan.iter().all(|r| r.category_name.is_none()));
    }

    #[test]
    fn duplicate_reviews_fan_out_rows() {
        let view = build_sales(&tables(), &SalesFilter::for_year(2023));
        // o1 has two items and two reviews: 2 x 2 rows.
        assert_eq!(view.len(), 4);
        let scores: Vec<Option<u8>> = view.records().iter().map(|r| r.review_score).collect();
        assert_eq!(scores, vec![Some(5), Some(3), Some(5), Some(3)]);
    }

    #[test]
    fn status_filter_is_exact_and_drops_unmatched_orders() {
        let filter = SalesFilter {
            status: Some("Delivered".to_string()),
            ..SalesFilter::default()
        };
        assert!(build_sales(&tables(), &filter).is_empty());

        let all = SalesFilter {
            year: None,
            month: None,
            status: None,
        };
        let view = build_sales(&tables(), &all);
        let orphan = view
            .records()
            .iter()
            .find(|r| r.order_id == "o_orphan")
            .expect("orphan item kept without filters");
        assert_eq!(orphan.order_status, None);
        assert_eq!(orphan.month, None);
    }

    #[test]
    fn year_and_month_filters_apply_to_purchase_dates() {
        let filter = SalesFilter {
            year: Some(2023),
            month: Some(2),
            status: None,
        };
        let view = build_sales(&tables(), &filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].order_id, "o2");
        assert_eq!(view.records()[0].state.as_deref(), Some("RJ"));
    }

    #[test]
    fn delivery_days_are_floored_and_null_without_delivery() {
        let view = build_sales(
            &tables(),
            &SalesFilter {
                status: None,
                ..SalesFilter::default()
            },
        );
        let o1 = view
            .records()
            .iter()
            .find(|r| r.order_id == "o1")
            .expect("o1");
        // 3 days 23 hours.
        assert_eq!(o1.delivery_days, Some(3));
        let o2 = view
            .records()
            .iter()
            .find(|r| r.order_id == "o2")
            .expect("o2");
        assert_eq!(o2.delivery_days, None);
    }

    #[test]
    fn missing_customer_leaves_state_null() {
        let view = build_sales(&tables(), &SalesFilter::for_year(2022));
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].customer_id.as_deref(), Some("c_missing"));
        assert_eq!(view.records()[0].state, None);
    }

    #[test]
    fn view_carries_table_dimensions() {
        let view = build_sales(&tables(), &SalesFilter::default());
        assert!(view.has(Dimension::Category));
        assert!(view.has(Dimension::DeliveryDays));
    }

    #[test]
    fn negative_durations_floor_towards_earlier_day() {
        assert_eq!(days_between(ts(2023, 1, 5, 10), ts(2023, 1, 5, 9)), -1);
        assert_eq!(days_between(ts(2023, 1, 5, 10), ts(2023, 1, 9, 10)), 4);
    }
}
