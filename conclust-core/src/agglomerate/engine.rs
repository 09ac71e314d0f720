//! The agglomeration loop.
//!
//! One iteration per merge: find the minimum-dissimilarity legal pair,
//! fuse it, propagate distances to every other active cluster through the
//! Lance-Williams recurrence, and update the contiguity graph. When a
//! constrained run exhausts every legal pair before a single cluster
//! remains, the disconnection resolver forces one bridging merge with a
//! missing height and the normal search resumes.
//!
//! Tie-breaking is deterministic: candidates are enumerated in ascending
//! cluster id, then ascending partner id, and only a strictly smaller
//! dissimilarity displaces the current best. Alternative tie-broken
//! outcomes would be statistically equivalent, not identical.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use super::adjacency::AdjacencyTracker;
use super::store::DistanceStore;
use super::{Constraint, RawStep};
use crate::dissimilarity::Dissimilarity;
use crate::linkage::{DistanceSpace, Linkage};

pub(super) struct MergeEngine {
    method: Linkage,
    beta: f64,
    space: DistanceSpace,
    store: DistanceStore,
    adjacency: Option<AdjacencyTracker>,
    active: BTreeSet<usize>,
    sizes: Vec<f64>,
    n: usize,
    steps: Vec<RawStep>,
}

impl MergeEngine {
    pub(super) fn new(
        input: &Dissimilarity,
        method: Linkage,
        beta: f64,
        constraint: &Constraint,
        members: Option<&[f64]>,
    ) -> Self {
        let n = input.len();
        let space = method.space();
        let adjacency = match constraint {
            Constraint::Unconstrained => None,
            Constraint::Links(links) => Some(AdjacencyTracker::from_links(n, links)),
            Constraint::Chronological => Some(AdjacencyTracker::chronological(n)),
        };
        let mut sizes = Vec::with_capacity(2 * n - 1);
        match members {
            Some(weights) => sizes.extend_from_slice(weights),
            None => sizes.resize(n, 1.0),
        }
        Self {
            method,
            beta,
            space,
            store: DistanceStore::new(input, space),
            adjacency,
            active: (0..n).collect(),
            sizes,
            n,
            steps: Vec::with_capacity(n - 1),
        }
    }

    /// Runs the loop to completion, producing exactly n-1 merge records.
    pub(super) fn run(mut self) -> Vec<RawStep> {
        while self.active.len() > 1 {
            match self.best_pair() {
                Some((left, right)) => self.merge(left, right, false),
                // Every component has collapsed to a single cluster and no
                // legal pair remains anywhere: bridge two components.
                None => self.resolve_disconnection(),
            }
        }
        self.steps
    }

    /// Scans the legal pairs for the minimum working-space distance.
    fn best_pair(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize, f64)> = None;
        match self.adjacency.as_ref() {
            None => {
                for &i in &self.active {
                    for &j in self.active.range((Excluded(i), Unbounded)) {
                        self.consider(&mut best, i, j);
                    }
                }
            }
            Some(tracker) => {
                for &i in &self.active {
                    for &j in tracker.neighbours(i).range((Excluded(i), Unbounded)) {
                        self.consider(&mut best, i, j);
                    }
                }
            }
        }
        best.map(|(i, j, _)| (i, j))
    }

    fn consider(&self, best: &mut Option<(usize, usize, f64)>, i: usize, j: usize) {
        let distance = self.store.get(i, j);
        if best.is_none_or(|(_, _, current)| distance < current) {
            *best = Some((i, j, distance));
        }
    }

    /// Fuses `left` and `right` into a fresh cluster id and propagates its
    /// distance to every other active cluster.
    fn merge(&mut self, left: usize, right: usize, forced: bool) {
        let merged = self.n + self.steps.len();
        let d_between = self.store.get(left, right);
        let n_left = self.sizes[left];
        let n_right = self.sizes[right];

        for &other in &self.active {
            if other == left || other == right {
                continue;
            }
            let coefficients =
                self.method
                    .coefficients(n_left, n_right, self.sizes[other], self.beta);
            let updated = coefficients.combine(
                self.store.get(left, other),
                self.store.get(right, other),
                d_between,
            );
            self.store.set(merged, other, updated);
        }

        self.active.remove(&left);
        self.active.remove(&right);
        self.active.insert(merged);
        self.sizes.push(n_left + n_right);
        if let Some(tracker) = self.adjacency.as_mut() {
            tracker.merge(left, right, merged);
        }

        let height = (!forced).then(|| self.space.on_record(d_between));
        self.steps.push(RawStep {
            left,
            right,
            height,
        });
    }

    /// Bridges the two disjoint components with the smallest minimum ids by
    /// merging their smallest-id clusters at a missing height.
    fn resolve_disconnection(&mut self) {
        let components = self
            .adjacency
            .as_ref()
            .map(|tracker| tracker.components(&self.active))
            .unwrap_or_default();
        debug_assert!(
            components.len() >= 2,
            "resolver invoked on a connected graph"
        );
        let (Some(first), Some(second)) = (components.first(), components.get(1)) else {
            return;
        };
        let left = first[0];
        let right = second[0];
        self.merge(left, right, true);
    }
}
