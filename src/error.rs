use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for split operations.
pub type SplitResult<T> = Result<T, SplitError>;

/// Error type returned by the split pipeline.
///
/// The first error raised in any phase stops the run; nothing is retried.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The configured input file does not exist.
    #[error("input file not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// No header contains the key column marker.
    #[error("no column containing '{marker}' found. available columns: {headers:?}")]
    ColumnNotFound { marker: String, headers: Vec<String> },

    /// Two distinct keys sanitize to the same output filename.
    #[error("keys '{existing}' and '{incoming}' both map to output file '{filename}'")]
    FilenameCollision {
        filename: String,
        existing: String,
        incoming: String,
    },

    /// Underlying I/O error while creating directories or writing files.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Index serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SplitError {
    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SplitError::InputNotFound { .. } => 2,
            SplitError::ColumnNotFound { .. } => 3,
            SplitError::FilenameCollision { .. } => 4,
            SplitError::Io(_) | SplitError::Csv(_) | SplitError::Json(_) => 1,
        }
    }
}
