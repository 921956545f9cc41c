//! Candidate and context types shared with the prediction pipeline.

use data_loader::{ItemId, Locale};
use std::collections::HashSet;

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    /// Ranked successor of the session's last item
    Transition,
    /// Global fallback list
    Fallback,
}

/// One candidate next item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub item_id: ItemId,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(item_id: impl Into<ItemId>, source: CandidateSource) -> Self {
        Self {
            item_id: item_id.into(),
            source,
        }
    }
}

/// What the backfill step needs to know about one test session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub locale: Locale,
    /// Items the user already interacted with in this session
    pub seen_items: HashSet<ItemId>,
    /// Items already placed in the prediction by the ranked list
    pub ranked_items: HashSet<ItemId>,
}

impl SessionContext {
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            seen_items: HashSet::new(),
            ranked_items: HashSet::new(),
        }
    }
}
