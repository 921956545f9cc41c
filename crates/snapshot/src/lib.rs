//! # Snapshot Crate
//!
//! Persists the final prediction table (one row per test session) and
//! reads it back unchanged: same rows, same order, same item strings.
//!
//! ```ignore
//! use snapshot::{save_snapshot, load_snapshot, PredictionRecord};
//!
//! save_snapshot(Path::new("out/rule_recall_100_test.jsonl"), &records)?;
//! let records = load_snapshot(Path::new("out/rule_recall_100_test.jsonl"))?;
//! ```

pub mod error;
pub mod store;
pub mod stats;

pub use error::{Result, SnapshotError};
pub use stats::{describe_lengths, LengthStats};
pub use store::{load_snapshot, read_records, save_snapshot, write_records, PredictionRecord};
