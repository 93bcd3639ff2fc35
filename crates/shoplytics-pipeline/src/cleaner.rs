//! Pure per-table transforms from raw string tables to typed records.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

use shoplytics_core::error::PipelineError;
use shoplytics_core::sales::{Dimension, Dimensions};
use shoplytics_core::tables::{
    CleanedTables, Customer, Order, OrderItem, Product, RawTable, RawTables, Review, Table,
};

const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
const APPROVED_AT: &str = "order_approved_at";
const DELIVERED_CARRIER_DATE: &str = "order_delivered_carrier_date";
const DELIVERED_CUSTOMER_DATE: &str = "order_delivered_customer_date";
const ESTIMATED_DELIVERY_DATE: &str = "order_estimated_delivery_date";

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp cell. A bare date is read as midnight.
pub fn parse_timestamp(column: &str, raw: &str) -> Result<NaiveDateTime, PipelineError> {
    let value = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PipelineError::DateParse {
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_optional_timestamp(
    column: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDateTime>, PipelineError> {
    raw.map(|v| parse_timestamp(column, v)).transpose()
}

fn parse_amount(table: &'static str, column: &str, raw: &str) -> Result<f64, PipelineError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(PipelineError::invalid_value(
            table,
            column,
            raw,
            "a non-negative number",
        )),
    }
}

pub fn clean_orders(raw: &RawTable) -> Result<Table<Order>, PipelineError> {
    let table = raw.dataset().as_str();
    let order_id = raw.column("order_id")?;
    let customer_id = raw.column("customer_id")?;
    let status = raw.column("order_status")?;
    let purchase = raw.column(PURCHASE_TIMESTAMP)?;
    let approved = raw.optional_column(APPROVED_AT);
    let carrier = raw.optional_column(DELIVERED_CARRIER_DATE);
    let delivered = raw.optional_column(DELIVERED_CUSTOMER_DATE);
    let estimated = raw.optional_column(ESTIMATED_DELIVERY_DATE);

    let mut rows = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let purchase_timestamp = parse_timestamp(PURCHASE_TIMESTAMP, row.get(purchase))?;
        rows.push(Order {
            order_id: row.get(order_id).to_string(),
            customer_id: row.get(customer_id).to_string(),
            order_status: row.get(status).to_string(),
            purchase_timestamp,
            approved_at: parse_optional_timestamp(APPROVED_AT, row.get_opt(approved))?,
            delivered_carrier_date: parse_optional_timestamp(
                DELIVERED_CARRIER_DATE,
                row.get_opt(carrier),
            )?,
            delivered_customer_date: parse_optional_timestamp(
                DELIVERED_CUSTOMER_DATE,
                row.get_opt(delivered),
            )?,
            estimated_delivery_date: parse_optional_timestamp(
                ESTIMATED_DELIVERY_DATE,
                row.get_opt(estimated),
            )?,
            year: purchase_timestamp.year(),
            month: purchase_timestamp.month(),
        });
    }

    let mut provides = Dimensions::of(&[Dimension::Month]);
    if delivered.is_some() {
        provides = provides.with(Dimension::DeliveryDays);
    }
    debug!(table, rows = rows.len(), "Cleaned orders");
    Ok(Table::new(rows, provides))
}

pub fn clean_order_items(raw: &RawTable) -> Result<Table<OrderItem>, PipelineError> {
    let table = raw.dataset().as_str();
    let order_id = raw.column("order_id")?;
    let order_item_id = raw.column("order_item_id")?;
    let product_id = raw.column("product_id")?;
    let price = raw.column("price")?;
    let freight_value = raw.column("freight_value")?;

    let mut rows = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let item_id = row.get(order_item_id);
        let price_value = parse_amount(table, "price", row.get(price))?;
        let freight = parse_amount(table, "freight_value", row.get(freight_value))?;
        rows.push(OrderItem {
            order_id: row.get(order_id).to_string(),
            order_item_id: item_id.parse().map_err(|_| {
                PipelineError::invalid_value(table, "order_item_id", item_id, "a positive integer")
            })?,
            product_id: row.get(product_id).to_string(),
            price: price_value,
            freight_value: freight,
            total_item_value: price_value + freight,
        });
    }

    debug!(table, rows = rows.len(), "Cleaned order items");
    Ok(Table::new(rows, Dimensions::none()))
}

pub fn clean_products(raw: &RawTable) -> Result<Table<Product>, PipelineError> {
    let product_id = raw.column("product_id")?;
    let category = raw.optional_column("product_category_name");

    let rows = raw
        .rows()
        .map(|row| Product {
            product_id: row.get(product_id).to_string(),
            category_name: row.get_opt(category).map(str::to_string),
        })
        .collect();

    let provides = if category.is_some() {
        Dimensions::of(&[Dimension::Category])
    } else {
        Dimensions::none()
    };
    Ok(Table::new(rows, provides))
}

pub fn clean_customers(raw: &RawTable) -> Result<Table<Customer>, PipelineError> {
    let customer_id = raw.column("customer_id")?;
    let state = raw.optional_column("customer_state");
    let city = raw.optional_column("customer_city");

    let rows = raw
        .rows()
        .map(|row| Customer {
            customer_id: row.get(customer_id).to_string(),
            state: row.get_opt(state).map(str::to_string),
            city: row.get_opt(city).map(str::to_string),
        })
        .collect();

    let provides = if state.is_some() {
        Dimensions::of(&[Dimension::State])
    } else {
        Dimensions::none()
    };
    Ok(Table::new(rows, provides))
}

pub fn clean_reviews(raw: &RawTable) -> Result<Table<Review>, PipelineError> {
    let table = raw.dataset().as_str();
    let order_id = raw.column("order_id")?;
    let score_col = raw.column("review_score")?;
    let review_id = raw.optional_column("review_id");
    let created = raw.optional_column("review_creation_date");
    let answered = raw.optional_column("review_answer_timestamp");

    let mut rows = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let score = match row.get(score_col) {
            "" => None,
            value => Some(parse_score(table, value)?),
        };
        rows.push(Review {
            review_id: row.get_opt(review_id).map(str::to_string),
            order_id: row.get(order_id).to_string(),
            score,
            creation_date: parse_optional_timestamp(
                "review_creation_date",
                row.get_opt(created),
            )?,
            answer_timestamp: parse_optional_timestamp(
                "review_answer_timestamp",
                row.get_opt(answered),
            )?,
        });
    }

    Ok(Table::new(rows, Dimensions::of(&[Dimension::ReviewScore])))
}

fn parse_score(table: &'static str, raw: &str) -> Result<u8, PipelineError> {
    // Some exports write integral scores as floats ("4.0").
    let parsed = raw
        .parse::<u8>()
        .ok()
        .or_else(|| match raw.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && (0.0..=255.0).contains(&v) => Some(v as u8),
            _ => None,
        });
    match parsed {
        Some(score @ 1..=5) => Ok(score),
        _ => Err(PipelineError::invalid_value(
            table,
            "review_score",
            raw,
            "an integer from 1 to 5",
        )),
    }
}

/// Clean all five tables. Consumes the raw tables.
pub fn clean_all(raw: RawTables) -> Result<CleanedTables, PipelineError> {
    Ok(CleanedTables {
        orders: clean_orders(&raw.orders)?,
        order_items: clean_order_items(&raw.order_items)?,
        products: clean_products(&raw.products)?,
        customers: clean_customers(&raw.customers)?,
        reviews: clean_reviews(&raw.reviews)?,
    })
}
