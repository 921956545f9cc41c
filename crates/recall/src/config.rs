//! Recall constants.
//!
//! The sizes below are part of the output contract (the downstream
//! re-ranker expects exactly this many candidates), so the CLI never
//! exposes them. The `with_*` setters exist for tests and benchmarks.

/// Successors kept per source item
pub const PER_ITEM_TOP_K: usize = 100;

/// Length of the global fallback list
pub const FALLBACK_TOP_K: usize = 200;

/// Candidates produced per test session
pub const PREDICTION_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecallConfig {
    pub per_item_top_k: usize,
    pub fallback_top_k: usize,
    pub prediction_size: usize,
}

impl RecallConfig {
    pub fn new() -> Self {
        Self {
            per_item_top_k: PER_ITEM_TOP_K,
            fallback_top_k: FALLBACK_TOP_K,
            prediction_size: PREDICTION_SIZE,
        }
    }

    /// Configure successors kept per item (default: 100)
    pub fn with_per_item_top_k(mut self, k: usize) -> Self {
        self.per_item_top_k = k;
        self
    }

    /// Configure fallback list length (default: 200)
    pub fn with_fallback_top_k(mut self, k: usize) -> Self {
        self.fallback_top_k = k;
        self
    }

    /// Configure candidates per session (default: 100)
    pub fn with_prediction_size(mut self, size: usize) -> Self {
        self.prediction_size = size;
        self
    }
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self::new()
    }
}
