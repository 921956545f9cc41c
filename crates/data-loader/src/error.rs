//! Error types for the data-loader crate.
//!
//! Only I/O and CSV framing problems are errors here. The `prev_items`
//! text itself is tokenized leniently and never fails.

use thiserror::Error;

/// Errors that can occur while loading session files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV record couldn't be decoded into a session row
    ///
    /// `line` is the 1-based line where the record starts in the file
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// The CSV reader itself failed (e.g. unreadable header row)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
