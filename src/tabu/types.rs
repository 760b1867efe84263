//! Search memory structures and the shared evaluation context.

use std::collections::VecDeque;

use bitvec::prelude::*;

use crate::dataset::Dataset;
use crate::fuzzy::FuzzyLabels;

/// The read-only context a refinement run evaluates against.
///
/// Both references stay immutable for the duration of the run; the only
/// mutable state lives inside the runner itself.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// The labeled dataset.
    pub dataset: &'a Dataset,
    /// The precomputed fuzzy label table for the dataset.
    pub labels: &'a FuzzyLabels,
}

impl<'a> SearchContext<'a> {
    /// Bundles a dataset with its fuzzy label table.
    pub fn new(dataset: &'a Dataset, labels: &'a FuzzyLabels) -> Self {
        Self { dataset, labels }
    }
}

/// Short-term memory: a FIFO ring of recently forbidden bit patterns.
///
/// Keyed on a single variable's bit content, not on whole rules. The list
/// starts (and is reset to) full of zero-width placeholder entries, so its
/// length always equals its capacity and every insertion evicts the
/// oldest entry.
#[derive(Debug, Clone)]
pub struct TabuList {
    entries: VecDeque<BitVec>,
    capacity: usize,
}

impl TabuList {
    /// Creates a list of the given capacity (at least 1), prefilled with
    /// placeholder entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut list = Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        };
        list.reset();
        list
    }

    /// Whether `pattern` is currently forbidden.
    pub fn contains(&self, pattern: &BitSlice) -> bool {
        self.entries.iter().any(|e| e.as_bitslice() == pattern)
    }

    /// Inserts `pattern`, evicting the oldest entry once over capacity.
    pub fn insert(&mut self, pattern: BitVec) {
        self.entries.push_back(pattern);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Clears the list back to its initial placeholder-filled state.
    pub fn reset(&mut self) {
        self.entries.clear();
        for _ in 0..self.capacity {
            self.entries.push_back(BitVec::new());
        }
    }

    /// Current number of entries (placeholders included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries. Never true in practice, since
    /// the list is placeholder-filled on construction and reset.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Long-term memory: occurrence counters of every distinct variable bit
/// pattern the walk has passed through.
///
/// Entries are kept in insertion order, so frequency-ranked snapshots are
/// deterministic (stable sort breaks counter ties by first appearance).
/// Counters are decayed, never deleted, across reinitializations.
#[derive(Debug, Clone, Default)]
pub struct LongTermMemory {
    entries: Vec<(BitVec, u64)>,
}

impl LongTermMemory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter of `pattern`, inserting it with count 1 on
    /// first appearance.
    pub fn record(&mut self, pattern: &BitSlice) {
        for (entry, count) in &mut self.entries {
            if entry.as_bitslice() == pattern {
                *count += 1;
                return;
            }
        }
        self.entries.push((pattern.to_bitvec(), 1));
    }

    /// Returns the patterns ranked for reinitialization: most-frequent
    /// first when `favor_most_frequent`, least-frequent first otherwise.
    /// Ties preserve insertion order.
    pub fn ranked(&self, favor_most_frequent: bool) -> Vec<&BitVec> {
        let mut indices: Vec<usize> = (0..self.entries.len()).collect();
        if favor_most_frequent {
            indices.sort_by(|&a, &b| self.entries[b].1.cmp(&self.entries[a].1));
        } else {
            indices.sort_by(|&a, &b| self.entries[a].1.cmp(&self.entries[b].1));
        }
        indices.into_iter().map(|i| &self.entries[i].0).collect()
    }

    /// Halves every counter (rounding up), so dominant patterns lose
    /// influence over time without the memory forgetting them entirely.
    pub fn decay(&mut self) {
        for (_, count) in &mut self.entries {
            *count = (*count + 1) / 2;
        }
    }

    /// Looks up the current counter of `pattern`.
    pub fn count(&self, pattern: &BitSlice) -> Option<u64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_bitslice() == pattern)
            .map(|(_, count)| *count)
    }

    /// Number of distinct patterns recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
