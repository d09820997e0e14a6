//! Error types for the Assay library.

use thiserror::Error;

/// Main error type for Assay operations.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Source and destination tables disagree on row count under a mapping.
    #[error(
        "row count mismatch for mapping into '{destination}': source has {source_rows} rows, destination has {dest_rows}"
    )]
    ShapeMismatch {
        destination: String,
        source_rows: usize,
        dest_rows: usize,
    },

    /// A mapping or lookup referenced a column the table does not have.
    #[error("unknown column '{column}' in {table} table")]
    UnknownColumn { column: String, table: String },

    /// Empty file or no data to analyze.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;
