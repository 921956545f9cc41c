//! Transition Table - who follows whom across all sessions
//!
//! Every adjacent pair `(items[i], items[i + 1])` in a session is one
//! observed transition. Training sessions also contribute one terminal
//! transition from their last item to the labeled next item. Test
//! sessions contribute their internal pairs only, which enriches sparse
//! items with test-time structure without touching any label.
//!
//! ## Layout
//! Item strings are interned once; each source item owns an
//! [`OrderedCounter`] of successor ids. Counting is streaming, so the
//! table grows with the number of distinct (source, successor) pairs,
//! not with the number of transitions.
//!
//! Sources are stored in the order they were first seen as a source.
//! Together with the counters' first-seen order this fixes every
//! tie-break downstream.

use crate::counter::OrderedCounter;
use data_loader::{ItemId, SessionData, TestSession, TrainSession};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Dense index of an interned item
pub(crate) type ItemIdx = u32;

/// String <-> index mapping, indices assigned in first-seen order
#[derive(Debug, Default)]
struct ItemInterner {
    index: HashMap<ItemId, ItemIdx>,
    names: Vec<ItemId>,
}

impl ItemInterner {
    fn intern(&mut self, item: &str) -> ItemIdx {
        if let Some(&idx) = self.index.get(item) {
            return idx;
        }
        let idx = self.names.len() as ItemIdx;
        self.names.push(item.to_string());
        self.index.insert(item.to_string(), idx);
        idx
    }

    fn lookup(&self, item: &str) -> Option<ItemIdx> {
        self.index.get(item).copied()
    }

    fn name(&self, idx: ItemIdx) -> &str {
        &self.names[idx as usize]
    }
}

/// One source item and the successors observed after it
#[derive(Debug)]
pub(crate) struct SourceEntry {
    pub(crate) item: ItemIdx,
    pub(crate) successors: OrderedCounter<ItemIdx>,
}

/// Counters describing what went into a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub train_sessions: usize,
    pub test_sessions: usize,
    pub train_transitions: u64,
    pub test_transitions: u64,
    /// Sessions whose item list was empty; they contribute nothing
    pub empty_sessions: usize,
}

impl BuildStats {
    pub fn total_transitions(&self) -> u64 {
        self.train_transitions + self.test_transitions
    }
}

/// Accumulates transitions for one recall run.
///
/// Owned by the caller and consumed by [`build`](Self::build); nothing is
/// shared between runs.
#[derive(Debug, Default)]
pub struct TransitionTableBuilder {
    items: ItemInterner,
    sources: Vec<SourceEntry>,
    source_index: HashMap<ItemIdx, usize>,
    stats: BuildStats,
}

impl TransitionTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the transitions of a labeled training session
    ///
    /// A session of length L records L transitions: L - 1 internal pairs
    /// plus `last -> next_item`. Returns the number recorded.
    pub fn add_train_session(&mut self, session: &TrainSession) -> usize {
        self.stats.train_sessions += 1;
        let Some(last) = session.items.last() else {
            self.stats.empty_sessions += 1;
            debug!("Skipping training session with no items");
            return 0;
        };

        let recorded = self.record_pairs(&session.items) + 1;
        self.record(last, &session.next_item);
        self.stats.train_transitions += recorded as u64;
        recorded
    }

    /// Record the internal transitions of an unlabeled test session
    ///
    /// A session of length L >= 2 records L - 1 transitions; length 1
    /// records none. Returns the number recorded.
    pub fn add_test_session(&mut self, session: &TestSession) -> usize {
        self.stats.test_sessions += 1;
        if session.items.is_empty() {
            self.stats.empty_sessions += 1;
            debug!("Skipping test session with no items");
            return 0;
        }

        let recorded = self.record_pairs(&session.items);
        self.stats.test_transitions += recorded as u64;
        recorded
    }

    /// Add every training session, then every test session, in file order
    pub fn add_sessions(&mut self, data: &SessionData) {
        for session in data.train_sessions() {
            self.add_train_session(session);
        }
        for session in data.test_sessions() {
            self.add_test_session(session);
        }
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Freeze the accumulated transitions into a read-only table
    pub fn build(self) -> TransitionTable {
        if self.stats.empty_sessions > 0 {
            warn!(
                "{} sessions had no items and contributed no transitions",
                self.stats.empty_sessions
            );
        }
        TransitionTable {
            items: self.items,
            sources: self.sources,
            source_index: self.source_index,
            stats: self.stats,
        }
    }

    fn record_pairs(&mut self, items: &[ItemId]) -> usize {
        for pair in items.windows(2) {
            self.record(&pair[0], &pair[1]);
        }
        items.len().saturating_sub(1)
    }

    fn record(&mut self, from: &str, to: &str) {
        let from = self.items.intern(from);
        let to = self.items.intern(to);

        let pos = match self.source_index.get(&from) {
            Some(&pos) => pos,
            None => {
                let pos = self.sources.len();
                self.sources.push(SourceEntry {
                    item: from,
                    successors: OrderedCounter::new(),
                });
                self.source_index.insert(from, pos);
                pos
            }
        };
        self.sources[pos].successors.add(to);
    }
}

/// Read-only transition counts for every source item
#[derive(Debug)]
pub struct TransitionTable {
    items: ItemInterner,
    sources: Vec<SourceEntry>,
    source_index: HashMap<ItemIdx, usize>,
    stats: BuildStats,
}

impl TransitionTable {
    /// Build the table from all training sessions followed by all test sessions
    #[instrument(skip(data))]
    pub fn from_sessions(data: &SessionData) -> Self {
        let start = Instant::now();
        let mut builder = TransitionTableBuilder::new();
        builder.add_sessions(data);
        let table = builder.build();

        info!(
            "Built transition table: {} source items, {} transitions ({} train, {} test) in {:.2?}",
            table.source_count(),
            table.stats.total_transitions(),
            table.stats.train_transitions,
            table.stats.test_transitions,
            start.elapsed()
        );
        table
    }

    /// Successors of `item` with their counts, in first-seen order.
    ///
    /// `None` if `item` was never the source of a transition.
    pub fn successors(&self, item: &str) -> Option<Vec<(&str, u64)>> {
        let entry = self.source_entry(item)?;
        Some(
            entry
                .successors
                .iter()
                .map(|(&idx, count)| (self.items.name(idx), count))
                .collect(),
        )
    }

    /// Whether `item` was ever the source of a transition
    pub fn contains_source(&self, item: &str) -> bool {
        self.source_entry(item).is_some()
    }

    /// Number of distinct source items
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of transitions recorded (multiset size over all sources)
    pub fn transition_count(&self) -> u64 {
        self.sources.iter().map(|s| s.successors.total()).sum()
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub(crate) fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    pub(crate) fn item_name(&self, idx: ItemIdx) -> &str {
        self.items.name(idx)
    }

    fn source_entry(&self, item: &str) -> Option<&SourceEntry> {
        let idx = self.items.lookup(item)?;
        let pos = *self.source_index.get(&idx)?;
        Some(&self.sources[pos])
    }
}
