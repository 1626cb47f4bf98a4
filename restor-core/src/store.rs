//! Priority queue and recombination table backing the best-first search.

use crate::types::{Hypothesis, QueueEntry, StateKey};
use std::collections::{BinaryHeap, HashMap};

/// Max-heap of hypotheses ordered by cumulative score, ties broken by
/// insertion order.
#[derive(Default)]
pub struct HypothesisQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl HypothesisQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, hyp: Hypothesis) {
        self.heap.push(QueueEntry(hyp));
    }

    pub fn pop(&mut self) -> Option<Hypothesis> {
        self.heap.pop().map(|e| e.0)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Tracks the best score seen so far for each [`StateKey`]. A hypothesis
/// popped from the queue whose key is no longer the best on record has been
/// superseded by an equivalent-or-better hypothesis and must be discarded
/// without expansion (lazy deletion).
#[derive(Default)]
pub struct RecombinationTable {
    best: HashMap<StateKey, f64>,
}

impl RecombinationTable {
    pub fn new() -> Self {
        Self {
            best: HashMap::new(),
        }
    }

    /// Records `score` for `key` if it improves on (or introduces) the
    /// current best, returning `true` when the hypothesis should be kept.
    pub fn offer(&mut self, key: StateKey, score: f64) -> bool {
        match self.best.get(&key) {
            Some(&best) if best >= score => false,
            _ => {
                self.best.insert(key, score);
                true
            }
        }
    }

    /// Whether `key`'s recorded best score still matches `score`, i.e.
    /// whether a hypothesis popped from the queue with this key/score is
    /// still live.
    pub fn is_current(&self, key: &StateKey, score: f64) -> bool {
        matches!(self.best.get(key), Some(&best) if best == score)
    }
}
