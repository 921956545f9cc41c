//! # Data Loader Crate
//!
//! Loads the session files that feed the rule-based recall stage.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (ItemId, TrainSession, TestSession, SessionData)
//! - **parser**: `prev_items` tokenizer and CSV readers
//! - **dataset**: Loading both files into a SessionData
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::SessionData;
//! use std::path::Path;
//!
//! let data = SessionData::load_from_files(
//!     Path::new("data/sessions_train.csv"),
//!     Path::new("data/sessions_test_task1.csv"),
//! )?;
//!
//! let (train, test) = data.counts();
//! println!("{} training sessions, {} test sessions", train, test);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::parse_item_sequence;
pub use types::{
    // Type aliases
    ItemId,
    Locale,
    // Core types
    TrainSession,
    TestSession,
    SessionData,
};
