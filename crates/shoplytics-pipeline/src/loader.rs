//! Reading the five source datasets into raw tables.

use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use shoplytics_core::error::PipelineError;
use shoplytics_core::tables::{DatasetName, RawTable, RawTables};

/// Anything that can hand out one raw table per logical dataset name.
pub trait TableSource {
    fn read_table(&self, dataset: DatasetName) -> Result<RawTable, PipelineError>;

    /// Human-readable location, used in logs.
    fn describe(&self) -> String;
}

/// A directory holding the CSV export, one file per dataset.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, dataset: DatasetName) -> PathBuf {
        self.root.join(dataset.file_name())
    }
}

impl TableSource for CsvDirectory {
    fn read_table(&self, dataset: DatasetName) -> Result<RawTable, PipelineError> {
        let path = self.path_for(dataset);
        if !path.is_file() {
            return Err(PipelineError::MissingSource {
                dataset: dataset.as_str(),
                path: path.display().to_string(),
            });
        }
        let file = std::fs::File::open(&path).map_err(|e| PipelineError::Read {
            dataset: dataset.as_str(),
            reason: format!("cannot open {}: {e}", path.display()),
        })?;
        read_csv(dataset, file)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Parse CSV text with a header row into a raw table.
pub fn read_csv<R: Read>(dataset: DatasetName, reader: R) -> Result<RawTable, PipelineError> {
    let read_err = |e: csv::Error| PipelineError::Read {
        dataset: dataset.as_str(),
        reason: e.to_string(),
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(read_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(dataset = %dataset, rows = rows.len(), columns = headers.len(), "Raw table read");
    Ok(RawTable::new(dataset, headers, rows))
}

/// Read all five datasets; the first missing one aborts the load.
pub fn load_raw_tables(source: &dyn TableSource) -> Result<RawTables, PipelineError> {
    Ok(RawTables {
        orders: source.read_table(DatasetName::Orders)?,
        order_items: source.read_table(DatasetName::OrderItems)?,
        products: source.read_table(DatasetName::Products)?,
        customers: source.read_table(DatasetName::Customers)?,
        reviews: source.read_table(DatasetName::Reviews)?,
    })
}
