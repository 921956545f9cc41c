//! # Recall Crate
//!
//! Rule-based candidate generation from session co-occurrence:
//! "after viewing X, users most often went to Y".
//!
//! ## Components
//!
//! ### Transition Table
//! Counts every observed adjacency `item -> next item` over training
//! sessions (including the labeled next item) and test sessions
//! (internal pairs only).
//!
//! ### Ranker
//! - Per item: the 100 most frequent successors
//! - Global: the 200 most frequent successors overall, used as fallback
//!
//! ## Example Usage
//!
//! ```ignore
//! use recall::{RecallConfig, RecallIndex, TransitionTable};
//! use data_loader::SessionData;
//!
//! let data = SessionData::load_from_files(train_path, test_path)?;
//! let table = TransitionTable::from_sessions(&data);
//! let index = RecallIndex::build(&table, &RecallConfig::default());
//!
//! let candidates = index.candidates_for("B09W9FND7K");
//! let fallback = index.fallback();
//! ```
//!
//! ## Determinism
//!
//! Every ordering decision follows first-seen order (sources, then
//! successors within a source). Hash map iteration order never leaks
//! into results.

// Public modules
pub mod config;
pub mod counter;
pub mod types;
pub mod session_context;
pub mod transitions;
pub mod ranker;

// Re-export commonly used types
pub use config::{RecallConfig, FALLBACK_TOP_K, PER_ITEM_TOP_K, PREDICTION_SIZE};
pub use counter::OrderedCounter;
pub use types::{Candidate, CandidateSource, SessionContext};
pub use transitions::{BuildStats, TransitionTable, TransitionTableBuilder};
pub use ranker::{global_fallback, rank_successors, RankedTable, RecallIndex};
