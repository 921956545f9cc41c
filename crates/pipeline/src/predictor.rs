//! Predictor - exactly-N candidates for every test session
//!
//! ## Algorithm
//! Look up the ranked list `base` of the session's last item, then:
//! 1. no `base` (item never seen as a source, or the session is empty):
//!    the first N fallback items, with no exclusions
//! 2. `base` has at least N items: its first N
//! 3. otherwise: `base`, then fallback items in order, skipping items
//!    already in `base` or in the session, until N or the fallback list
//!    runs out
//!
//! Case 3 can come up short when the fallback list is exhausted. The
//! short list is returned as-is; callers count it through
//! [`Prediction::is_short`].

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyRankedFilter, AlreadySeenFilter};
use anyhow::Result;
use data_loader::{ItemId, Locale, TestSession};
use rayon::prelude::*;
use recall::session_context::build_session_context;
use recall::{Candidate, CandidateSource, RecallConfig, RecallIndex};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Which rule produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionBranch {
    /// The last item had no ranked list
    FallbackOnly,
    /// The ranked list was long enough on its own
    Truncated,
    /// The ranked list was padded from the fallback list
    Backfilled,
}

/// Final candidate list for one test session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub locale: Locale,
    pub items: Vec<ItemId>,
    pub branch: PredictionBranch,
    /// How many of `items` came from the fallback list
    pub fallback_used: usize,
}

impl Prediction {
    /// True when fewer than `size` candidates could be produced
    pub fn is_short(&self, size: usize) -> bool {
        self.items.len() < size
    }
}

/// Produces predictions from a finished RecallIndex.
///
/// Holds the index behind an `Arc` (read-only, so no Mutex needed).
pub struct Predictor {
    index: Arc<RecallIndex>,
    backfill: FilterPipeline,
    prediction_size: usize,
}

impl Predictor {
    pub fn new(index: Arc<RecallIndex>, config: &RecallConfig) -> Self {
        let backfill = FilterPipeline::new()
            .add_filter(AlreadyRankedFilter)
            .add_filter(AlreadySeenFilter);
        Self {
            index,
            backfill,
            prediction_size: config.prediction_size,
        }
    }

    pub fn prediction_size(&self) -> usize {
        self.prediction_size
    }

    /// Predict the next-item candidates for one session
    pub fn predict(&self, session: &TestSession) -> Result<Prediction> {
        let size = self.prediction_size;
        let base = session
            .last_item()
            .and_then(|item| self.index.candidates_for(item));

        let prediction = match base {
            None => {
                let items: Vec<ItemId> = self.index.fallback().iter().take(size).cloned().collect();
                Prediction {
                    locale: session.locale.clone(),
                    fallback_used: items.len(),
                    items,
                    branch: PredictionBranch::FallbackOnly,
                }
            }
            Some(base) if base.len() >= size => Prediction {
                locale: session.locale.clone(),
                items: base[..size].to_vec(),
                branch: PredictionBranch::Truncated,
                fallback_used: 0,
            },
            Some(base) => {
                let backfill = self.backfill_candidates(session, base)?;
                let mut items = base.to_vec();
                items.extend(
                    backfill
                        .into_iter()
                        .take(size - base.len())
                        .map(|candidate| candidate.item_id),
                );
                Prediction {
                    locale: session.locale.clone(),
                    fallback_used: items.len() - base.len(),
                    items,
                    branch: PredictionBranch::Backfilled,
                }
            }
        };

        if prediction.is_short(size) {
            debug!(
                "Short prediction: {} of {} candidates (last item {:?})",
                prediction.items.len(),
                size,
                session.last_item()
            );
        }
        Ok(prediction)
    }

    /// Predict every session, keeping input order
    #[instrument(skip(self, sessions), fields(sessions = sessions.len()))]
    pub fn predict_all(&self, sessions: &[TestSession]) -> Result<Vec<Prediction>> {
        sessions
            .par_iter()
            .map(|session| self.predict(session))
            .collect()
    }

    /// Fallback items that may follow `base`, in fallback order
    fn backfill_candidates(&self, session: &TestSession, base: &[ItemId]) -> Result<Vec<Candidate>> {
        let context = build_session_context(session, Some(base));
        let candidates = self
            .index
            .fallback()
            .iter()
            .map(|item| Candidate::new(item.clone(), CandidateSource::Fallback))
            .collect();
        self.backfill.apply(candidates, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall::RankedTable;
    use std::collections::HashSet;

    fn ids(prefix: &str, n: usize) -> Vec<ItemId> {
        (0..n).map(|i| format!("{prefix}{i:03}")).collect()
    }

    fn strings(items: &[&str]) -> Vec<ItemId> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn session(items: &[&str]) -> TestSession {
        TestSession {
            items: strings(items),
            locale: "DE".to_string(),
        }
    }

    fn predictor(ranked: Vec<(ItemId, Vec<ItemId>)>, fallback: Vec<ItemId>) -> Predictor {
        let index = RecallIndex::from_parts(RankedTable::from_lists(ranked), fallback);
        Predictor::new(Arc::new(index), &RecallConfig::default())
    }

    #[test]
    fn test_unknown_last_item_uses_fallback_only() {
        // Fallback contains the session's own items; they are not excluded here
        let mut fallback = strings(&["P", "Q"]);
        fallback.extend(ids("F", 198));
        let predictor = predictor(vec![], fallback.clone());

        let prediction = predictor.predict(&session(&["P", "Q"])).unwrap();

        assert_eq!(prediction.branch, PredictionBranch::FallbackOnly);
        assert_eq!(prediction.items, fallback[..100].to_vec());
        assert_eq!(prediction.fallback_used, 100);
        assert_eq!(prediction.locale, "DE");
    }

    #[test]
    fn test_backfill_skips_ranked_and_seen_items() {
        let mut fallback = strings(&["B", "A", "P", "C", "Q", "D"]);
        fallback.extend(ids("F", 194));
        let predictor = predictor(vec![("Q".to_string(), strings(&["A", "B"]))], fallback);

        let prediction = predictor.predict(&session(&["P", "Q"])).unwrap();

        assert_eq!(prediction.branch, PredictionBranch::Backfilled);
        assert_eq!(prediction.items.len(), 100);
        assert_eq!(prediction.items[..4], strings(&["A", "B", "C", "D"])[..]);
        assert_eq!(prediction.items[4], "F000");
        assert_eq!(prediction.fallback_used, 98);
        assert!(!prediction.items.contains(&"P".to_string()));
        assert!(!prediction.items.contains(&"Q".to_string()));
    }

    #[test]
    fn test_long_ranked_list_is_truncated() {
        let ranked = ids("R", 150);
        let predictor = predictor(vec![("P".to_string(), ranked.clone())], ids("F", 200));

        let prediction = predictor.predict(&session(&["P"])).unwrap();

        assert_eq!(prediction.branch, PredictionBranch::Truncated);
        assert_eq!(prediction.items, ranked[..100].to_vec());
        assert_eq!(prediction.fallback_used, 0);
    }

    #[test]
    fn test_ranked_list_of_exactly_size_is_not_backfilled() {
        let ranked = ids("R", 100);
        let predictor = predictor(vec![("P".to_string(), ranked.clone())], ids("F", 200));

        let prediction = predictor.predict(&session(&["P"])).unwrap();
        assert_eq!(prediction.branch, PredictionBranch::Truncated);
        assert_eq!(prediction.items, ranked);
    }

    #[test]
    fn test_exhausted_fallback_gives_short_prediction() {
        let predictor = predictor(
            vec![("Q".to_string(), strings(&["A", "B"]))],
            strings(&["B", "C", "Q"]),
        );

        let prediction = predictor.predict(&session(&["P", "Q"])).unwrap();

        assert_eq!(prediction.items, strings(&["A", "B", "C"]));
        assert!(prediction.is_short(100));
        assert_eq!(prediction.fallback_used, 1);
    }

    #[test]
    fn test_empty_session_falls_back() {
        let predictor = predictor(vec![], ids("F", 200));

        let prediction = predictor.predict(&session(&[])).unwrap();
        assert_eq!(prediction.branch, PredictionBranch::FallbackOnly);
        assert_eq!(prediction.items.len(), 100);
    }

    #[test]
    fn test_predictions_have_no_duplicates() {
        let mut fallback = ids("R", 50);
        fallback.extend(ids("F", 150));
        let predictor = predictor(vec![("P".to_string(), ids("R", 60))], fallback);

        let prediction = predictor.predict(&session(&["X", "P"])).unwrap();
        let distinct: HashSet<&ItemId> = prediction.items.iter().collect();
        assert_eq!(distinct.len(), prediction.items.len());
        assert_eq!(prediction.items.len(), 100);
        assert_eq!(prediction.items[60], "F000");
    }

    #[test]
    fn test_predict_all_keeps_order() {
        let predictor = predictor(vec![("P".to_string(), strings(&["A"]))], ids("F", 200));
        let sessions = vec![
            TestSession { items: strings(&["P"]), locale: "DE".to_string() },
            TestSession { items: strings(&["Z"]), locale: "JP".to_string() },
            TestSession { items: strings(&["P"]), locale: "UK".to_string() },
        ];

        let predictions = predictor.predict_all(&sessions).unwrap();
        let locales: Vec<&str> = predictions.iter().map(|p| p.locale.as_str()).collect();
        assert_eq!(locales, vec!["DE", "JP", "UK"]);
        assert_eq!(predictions[0].items[0], "A");
        assert_eq!(predictions[1].items[0], "F000");
    }
}
