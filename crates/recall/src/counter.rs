//! Insertion-ordered frequency counter.
//!
//! Counts occurrences while remembering the order in which keys were
//! first seen. Ranking sorts stably by count, so ties resolve to
//! first-seen order and never depend on hash iteration order.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    /// (key, count) in first-seen order
    entries: Vec<(K, u64)>,
    /// key -> position in `entries`
    positions: HashMap<K, usize>,
    total: u64,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
            total: 0,
        }
    }

    /// Count one occurrence of `key`
    pub fn add(&mut self, key: K) {
        self.add_count(key, 1);
    }

    /// Count `count` occurrences of `key` at once
    pub fn add_count(&mut self, key: K, count: u64) {
        self.total += count;
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1 += count,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, count));
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// (key, count) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// The `k` most frequent keys, highest count first.
    ///
    /// Ties keep first-seen order.
    pub fn most_common(&self, k: usize) -> Vec<(&K, u64)> {
        let mut ranked: Vec<(&K, u64)> = self.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}
