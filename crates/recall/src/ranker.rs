//! Ranker - turns transition counts into candidate lists
//!
//! Two pure functions of a [`TransitionTable`]:
//! - [`rank_successors`]: per source item, the top-k successors
//! - [`global_fallback`]: the top-k successors across the whole table
//!
//! Both order by descending count and break ties by first appearance.
//! For the global list "first appearance" means the position in the
//! flattened view of the table (sources in first-seen order, each
//! source's successors in recorded order). Folding the per-source
//! counters in source order reproduces exactly that order without ever
//! materializing the flattened list.

use crate::config::RecallConfig;
use crate::counter::OrderedCounter;
use crate::transitions::TransitionTable;
use data_loader::ItemId;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Ranked successor lists keyed by source item, in source first-seen order
#[derive(Debug, Default)]
pub struct RankedTable {
    entries: Vec<(ItemId, Vec<ItemId>)>,
    index: HashMap<ItemId, usize>,
}

impl RankedTable {
    fn from_entries(entries: Vec<(ItemId, Vec<ItemId>)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(pos, (item, _))| (item.clone(), pos))
            .collect();
        Self { entries, index }
    }

    /// Build directly from (source, ranked list) pairs
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, Vec<ItemId>)>,
    {
        Self::from_entries(lists.into_iter().collect())
    }

    /// Ranked candidates for `item`, or `None` if it never had a successor
    pub fn get(&self, item: &str) -> Option<&[ItemId]> {
        self.index
            .get(item)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &[ItemId])> {
        self.entries
            .iter()
            .map(|(item, ranked)| (item, ranked.as_slice()))
    }
}

/// Top-`k` distinct successors of every source item
///
/// Sources are ranked in parallel; the indexed collect keeps the output
/// in source order, so the result is the same as a sequential pass.
#[instrument(skip(table), fields(sources = table.source_count()))]
pub fn rank_successors(table: &TransitionTable, k: usize) -> RankedTable {
    let entries: Vec<(ItemId, Vec<ItemId>)> = table
        .sources()
        .par_iter()
        .map(|entry| {
            let ranked = entry
                .successors
                .most_common(k)
                .into_iter()
                .map(|(&idx, _)| table.item_name(idx).to_string())
                .collect();
            (table.item_name(entry.item).to_string(), ranked)
        })
        .collect();

    debug!("Ranked successors for {} source items", entries.len());
    RankedTable::from_entries(entries)
}

/// The `k` items seen most often as a successor anywhere in the table
#[instrument(skip(table))]
pub fn global_fallback(table: &TransitionTable, k: usize) -> Vec<ItemId> {
    let mut counter = OrderedCounter::new();
    for entry in table.sources() {
        for (&idx, count) in entry.successors.iter() {
            counter.add_count(idx, count);
        }
    }

    let fallback: Vec<ItemId> = counter
        .most_common(k)
        .into_iter()
        .map(|(&idx, _)| table.item_name(idx).to_string())
        .collect();

    debug!(
        "Global fallback: {} items out of {} distinct successors",
        fallback.len(),
        counter.len()
    );
    fallback
}

/// Everything the predictor reads: per-item lists plus the fallback list
#[derive(Debug)]
pub struct RecallIndex {
    ranked: RankedTable,
    fallback: Vec<ItemId>,
}

impl RecallIndex {
    /// Rank a finished transition table
    pub fn build(table: &TransitionTable, config: &RecallConfig) -> Self {
        let start = Instant::now();
        let ranked = rank_successors(table, config.per_item_top_k);
        let fallback = global_fallback(table, config.fallback_top_k);

        info!(
            "Ranked {} source items (top {}), fallback list of {} (top {}) in {:.2?}",
            ranked.len(),
            config.per_item_top_k,
            fallback.len(),
            config.fallback_top_k,
            start.elapsed()
        );
        Self { ranked, fallback }
    }

    /// Assemble from precomputed parts
    pub fn from_parts(ranked: RankedTable, fallback: Vec<ItemId>) -> Self {
        Self { ranked, fallback }
    }

    /// Ranked candidates for `item`, if it was ever a transition source
    pub fn candidates_for(&self, item: &str) -> Option<&[ItemId]> {
        self.ranked.get(item)
    }

    pub fn ranked(&self) -> &RankedTable {
        &self.ranked
    }

    pub fn fallback(&self) -> &[ItemId] {
        &self.fallback
    }
}
