use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use shoplytics_core::error::PipelineError;
use shoplytics_core::sales::{SalesFilter, SalesView};
use shoplytics_core::summary::DataSummary;
use shoplytics_core::tables::CleanedTables;

use crate::cleaner::clean_all;
use crate::loader::{load_raw_tables, CsvDirectory, TableSource};
use crate::sales_view::build_sales;
use crate::summary::data_summary;

/// One loaded and cleaned source, immutable for its whole lifetime.
///
/// Sales views are rebuilt per filter; the tables themselves are shared
/// read-only between every caller.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    tables: CleanedTables,
}

impl Dataset {
    /// Load and clean the CSV export under `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Self::from_source(&CsvDirectory::new(dir.as_ref()))
    }

    pub fn from_source(source: &dyn TableSource) -> Result<Self, PipelineError> {
        let started = Instant::now();
        let raw = load_raw_tables(source)?;
        let tables = clean_all(raw)?;
        info!(
            source = %source.describe(),
            orders = tables.orders.len(),
            order_items = tables.order_items.len(),
            products = tables.products.len(),
            customers = tables.customers.len(),
            reviews = tables.reviews.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset loaded"
        );
        Ok(Self::from_tables(source.describe(), tables))
    }

    pub fn from_tables(source: impl Into<String>, tables: CleanedTables) -> Self {
        Self {
            source: source.into(),
            tables,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sales(&self, filter: &SalesFilter) -> SalesView {
        build_sales(&self.tables, filter)
    }

    pub fn summary(&self) -> DataSummary {
        data_summary(&self.tables)
    }

    /// Distinct purchase years, ascending.
    pub fn years_available(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.tables.orders.rows.iter().map(|o| o.year).collect();
        years.into_iter().collect()
    }
}
