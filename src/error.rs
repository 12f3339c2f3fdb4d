use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Data pipeline errors
// ---------------------------------------------------------------------------

/// Failures surfaced by the load / clean / filter pipeline.
///
/// `DataUnavailable` and `SchemaMismatch` are fatal for the current load;
/// `EmptyResultSet` is recoverable and rendered as a notice.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("cannot read data file {}: {source}", .path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema mismatch{}: column '{column}': {reason}", row_suffix(.row))]
    SchemaMismatch {
        /// 1-based data row, `None` for header-level problems.
        row: Option<usize>,
        column: String,
        reason: String,
    },

    #[error("no transactions match the current filters")]
    EmptyResultSet,
}

impl DataError {
    pub fn missing_column(column: &str) -> Self {
        DataError::SchemaMismatch {
            row: None,
            column: column.to_string(),
            reason: "column not found in header".to_string(),
        }
    }

    pub fn bad_cell(row: usize, column: &str, reason: impl Into<String>) -> Self {
        DataError::SchemaMismatch {
            row: Some(row),
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" at row {r}"),
        None => String::new(),
    }
}
