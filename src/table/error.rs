use polars::error::PolarsError;
use thiserror::Error;

fn archive_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" (archive reported: {reason})"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Response is missing key '{key}'{}", archive_reason(reason))]
    MissingKey {
        key: String,
        // The archive's own "reason" when the body is an error object
        reason: Option<String>,
    },

    #[error("Response key '{0}' is not an array")]
    NotAnArray(String),

    #[error("Column '{column}' has {found} entries but 'time' has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Unexpected value in column '{column}' at index {index}")]
    InvalidValue { column: String, index: usize },

    #[error("Failed to parse date '{value}' at index {index}, expected YYYY-MM-DD")]
    DateParse {
        value: String,
        index: usize,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
