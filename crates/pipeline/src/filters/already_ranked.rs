//! Filter to remove items the ranked list already contributed.

use crate::traits::Filter;
use anyhow::Result;
use recall::{Candidate, SessionContext};

/// Removes candidates already present in the prediction's ranked prefix.
pub struct AlreadyRankedFilter;

impl Filter for AlreadyRankedFilter {
    fn name(&self) -> &str {
        "AlreadyRankedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &SessionContext,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !context.ranked_items.contains(&candidate.item_id))
            .collect())
    }
}
