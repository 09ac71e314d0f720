//! Working distance store for the agglomeration loop.
//!
//! A flat condensed lower triangle over every cluster id the run can ever
//! allocate (`2n-1` for `n` observations). Rows for retired clusters go dead
//! but are never reclaimed; ids only grow, so sizing the triangle once
//! avoids reallocation churn for the whole run.

use crate::dissimilarity::Dissimilarity;
use crate::linkage::DistanceSpace;

#[derive(Clone, Debug)]
pub(super) struct DistanceStore {
    values: Vec<f64>,
}

impl DistanceStore {
    /// Seeds the store from the caller's condensed input, applying the
    /// method's working-space transform on entry.
    pub(super) fn new(input: &Dissimilarity, space: DistanceSpace) -> Self {
        let n = input.len();
        let capacity = 2 * n - 1;
        let mut store = Self {
            values: vec![0.0; capacity * (capacity - 1) / 2],
        };
        for j in 1..n {
            for i in 0..j {
                store.set(i, j, space.on_input(input.get(i, j)));
            }
        }
        store
    }

    /// Condensed offset for the unordered pair, keyed by the larger id so
    /// appending a cluster touches only fresh slots.
    fn offset(i: usize, j: usize) -> usize {
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        debug_assert!(low < high, "invalid pair ({i}, {j})");
        high * (high - 1) / 2 + low
    }

    pub(super) fn get(&self, i: usize, j: usize) -> f64 {
        self.values[Self::offset(i, j)]
    }

    pub(super) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[Self::offset(i, j)] = value;
    }
}
