//! Error types for limpar.

use std::path::PathBuf;

/// Result type alias for limpar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in limpar operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        /// The path where the error occurred, if known.
        path: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Arrow error during data processing.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error during file operations.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Column not found in schema.
    #[error("Column '{name}' not found in schema")]
    ColumnNotFound {
        /// The name of the missing column.
        name: String,
    },

    /// Schema mismatch between tables.
    #[error("Schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the schema mismatch.
        message: String,
    },

    /// Row count mismatch between tables that must be aligned.
    #[error("Row count mismatch: expected {expected} rows, got {actual}")]
    RowCountMismatch {
        /// Row count of the reference table.
        expected: usize,
        /// Row count of the other table.
        actual: usize,
    },

    /// Injected-row mask length does not match the table row count.
    #[error("Mask length {mask_len} does not match table row count {rows}")]
    MaskLengthMismatch {
        /// Length of the provided mask.
        mask_len: usize,
        /// Number of rows in the table.
        rows: usize,
    },

    /// Row index out of bounds.
    #[error("Row index {index} out of bounds for table with {len} rows")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The actual length of the table.
        len: usize,
    },

    /// Column has an Arrow type the metrics cannot compare.
    #[error("Unsupported column type for '{column}': {data_type}")]
    UnsupportedColumnType {
        /// The offending column.
        column: String,
        /// Display form of the Arrow data type.
        data_type: String,
    },

    /// Unsupported file format.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The unsupported format name or extension.
        format: String,
    },

    /// Empty table error.
    #[error("Table is empty")]
    EmptyTable,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Format error (serialization, parsing).
    #[error("Format error: {0}")]
    Format(String),
}

impl Error {
    /// Create an I/O error with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Create an I/O error without path context.
    pub fn io_no_path(source: std::io::Error) -> Self {
        Self::Io { path: None, source }
    }

    /// Create a column not found error.
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }

    /// Create an unsupported column type error.
    pub fn unsupported_column_type(
        column: impl Into<String>,
        data_type: impl std::fmt::Display,
    ) -> Self {
        Self::UnsupportedColumnType {
            column: column.into(),
            data_type: data_type.to_string(),
        }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
