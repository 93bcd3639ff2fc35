use thiserror::Error;

use crate::sales::Dimension;

/// Failures raised while loading, cleaning or aggregating a dataset.
///
/// Structural errors (`MissingSource`, `Schema`, `DateParse`, `Read`) abort the
/// operation that triggered them. `MissingDimension` is only recovered by the
/// comprehensive report, which renders it as an inline `{ "error": ... }` marker.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing source: dataset `{dataset}` not found at {path}")]
    MissingSource { dataset: &'static str, path: String },

    #[error("schema error in `{table}`: column `{column}` {reason}")]
    Schema {
        table: &'static str,
        column: String,
        reason: String,
    },

    #[error("date parse error in column `{column}`: cannot parse {value:?}")]
    DateParse { column: String, value: String },

    #[error("{} column not found in sales data", .0.label())]
    MissingDimension(Dimension),

    #[error("failed to read dataset `{dataset}`: {reason}")]
    Read { dataset: &'static str, reason: String },
}

impl PipelineError {
    pub fn missing_column(table: &'static str, column: &str) -> Self {
        Self::Schema {
            table,
            column: column.to_string(),
            reason: "is required but absent".to_string(),
        }
    }

    pub fn invalid_value(table: &'static str, column: &str, value: &str, expected: &str) -> Self {
        Self::Schema {
            table,
            column: column.to_string(),
            reason: format!("has invalid value {value:?} (expected {expected})"),
        }
    }
}
