//! Error types for batch code generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for batch operations
pub type Result<T> = std::result::Result<T, BatchError>;

/// Errors that can occur while building or writing a batch
#[derive(Debug, Error)]
pub enum BatchError {
    /// Core derivation error
    #[error(transparent)]
    Core(#[from] payg_core::Error),

    /// Batch input does not follow the expected layout
    #[error("Provided CSV invalid: {0}")]
    Format(String),

    /// A batch row was rejected by validation
    #[error("Provided CSV invalid: line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: payg_core::Error,
    },

    /// Configuration names columns that cannot form a matrix
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A built matrix broke its ordering guarantees
    #[error("Code matrix invalid: {0}")]
    Matrix(String),

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output directory or file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BatchError {
    /// Whether the batch was rejected because a provisioned key is too weak
    pub fn is_key_strength(&self) -> bool {
        match self {
            BatchError::Core(e) | BatchError::Row { source: e, .. } => e.is_key_strength(),
            _ => false,
        }
    }

    /// Whether the batch failed while generating codes rather than on its input
    pub fn is_generation_failure(&self) -> bool {
        match self {
            BatchError::Matrix(_)
            | BatchError::Write { .. }
            | BatchError::Core(payg_core::Error::Mac(_)) => true,
            _ => self.is_key_strength(),
        }
    }
}
