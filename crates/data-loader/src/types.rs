//! Core domain types for session data.
//!
//! Item identifiers are opaque product tokens (ASINs in the original
//! dataset). Nothing is assumed about them beyond equality and hashing,
//! so they stay plain `String`s behind a type alias.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Opaque product identifier, unique within a locale
pub type ItemId = String;

/// Marketplace locale of a session (e.g. "DE", "JP", "UK")
pub type Locale = String;

// =============================================================================
// Sessions
// =============================================================================

/// A training session: the items a user browsed, in order, plus the item
/// that actually came next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSession {
    pub items: Vec<ItemId>,
    pub next_item: ItemId,
    pub locale: Locale,
}

/// A held-out test session. Same shape as a training session without the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSession {
    pub items: Vec<ItemId>,
    pub locale: Locale,
}

impl TrainSession {
    /// The most recent item of the session, if the row had any tokens
    pub fn last_item(&self) -> Option<&ItemId> {
        self.items.last()
    }
}

impl TestSession {
    /// The most recent item of the session, if the row had any tokens
    pub fn last_item(&self) -> Option<&ItemId> {
        self.items.last()
    }
}

// =============================================================================
// SessionData - everything one recall run reads
// =============================================================================

/// Training and test sessions, each kept in file order.
///
/// File order matters: the transition table inherits its first-seen
/// ordering from it, and predictions are written in test-file order.
#[derive(Debug, Default)]
pub struct SessionData {
    pub(crate) train: Vec<TrainSession>,
    pub(crate) test: Vec<TestSession>,
}

impl SessionData {
    /// Creates an empty SessionData
    pub fn new() -> Self {
        Self {
            train: Vec::new(),
            test: Vec::new(),
        }
    }

    /// Build from already-parsed sessions
    pub fn from_sessions(train: Vec<TrainSession>, test: Vec<TestSession>) -> Self {
        Self { train, test }
    }

    pub fn train_sessions(&self) -> &[TrainSession] {
        &self.train
    }

    pub fn test_sessions(&self) -> &[TestSession] {
        &self.test
    }

    pub fn insert_train(&mut self, session: TrainSession) {
        self.train.push(session);
    }

    pub fn insert_test(&mut self, session: TestSession) {
        self.test.push(session);
    }

    /// Get counts for logging: (train sessions, test sessions)
    pub fn counts(&self) -> (usize, usize) {
        (self.train.len(), self.test.len())
    }
}
