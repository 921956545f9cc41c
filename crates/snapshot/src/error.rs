//! Error types for the snapshot crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    /// No snapshot at the given path
    #[error("Snapshot not found: {path}")]
    NotFound { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be decoded; `line` is 1-based
    #[error("Corrupt snapshot at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("Failed to encode prediction row: {0}")]
    Encode(#[from] serde_json::Error),

    /// The finished temp file could not be moved into place
    #[error("Failed to persist snapshot: {0}")]
    Persist(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
