//! Filter to remove items the session already contains.

use crate::traits::Filter;
use anyhow::Result;
use recall::{Candidate, SessionContext};

/// Removes candidates that appear in the session's own item sequence.
///
/// ## Algorithm
/// Uses the HashSet in SessionContext.seen_items for O(1) lookups.
pub struct AlreadySeenFilter;

impl Filter for AlreadySeenFilter {
    fn name(&self) -> &str {
        "AlreadySeenFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &SessionContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| !context.seen_items.contains(&candidate.item_id))
            .collect();
        Ok(filtered)
    }
}
