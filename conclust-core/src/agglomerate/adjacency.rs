//! Contiguity tracking for constrained runs.
//!
//! Each active cluster owns the set of ids it may legally merge with. After
//! merging A and B into C, C's set becomes (neighbours(A) ∪ neighbours(B))
//! \ {A, B}, and every set referencing A or B is rewritten to C, which
//! deduplicates clusters that were adjacent to both parents. `BTreeSet`
//! keeps each set in ascending order, which the engine's deterministic
//! candidate enumeration relies on.

use std::collections::BTreeSet;

#[derive(Clone, Debug)]
pub(super) struct AdjacencyTracker {
    sets: Vec<Option<BTreeSet<usize>>>,
}

impl AdjacencyTracker {
    /// Builds the tracker from validated, zero-based link pairs.
    pub(super) fn from_links(n: usize, links: &[(usize, usize)]) -> Self {
        let mut tracker = Self::with_leaves(n);
        for &(a, b) in links {
            tracker.connect(a, b);
        }
        tracker
    }

    /// Builds the implicit path graph for chronological clustering: each
    /// observation is adjacent to its successor only.
    pub(super) fn chronological(n: usize) -> Self {
        let mut tracker = Self::with_leaves(n);
        for i in 0..n - 1 {
            tracker.connect(i, i + 1);
        }
        tracker
    }

    fn with_leaves(n: usize) -> Self {
        let mut sets = vec![Some(BTreeSet::new()); n];
        sets.resize(2 * n - 1, None);
        Self { sets }
    }

    fn connect(&mut self, a: usize, b: usize) {
        if let Some(set) = self.sets[a].as_mut() {
            set.insert(b);
        }
        if let Some(set) = self.sets[b].as_mut() {
            set.insert(a);
        }
    }

    /// Returns the legal merge partners of an active cluster.
    pub(super) fn neighbours(&self, id: usize) -> &BTreeSet<usize> {
        self.sets[id]
            .as_ref()
            .unwrap_or_else(|| panic!("cluster {id} is not active"))
    }

    /// Retires `left` and `right` and installs their fusion as `merged`.
    pub(super) fn merge(&mut self, left: usize, right: usize, merged: usize) {
        let left_set = self.sets[left].take().unwrap_or_default();
        let right_set = self.sets[right].take().unwrap_or_default();
        let mut fused: BTreeSet<usize> = left_set.union(&right_set).copied().collect();
        fused.remove(&left);
        fused.remove(&right);

        for &neighbour in &fused {
            if let Some(set) = self.sets[neighbour].as_mut() {
                set.remove(&left);
                set.remove(&right);
                set.insert(merged);
            }
        }
        self.sets[merged] = Some(fused);
    }

    /// Enumerates the connected components of the active subgraph, each
    /// sorted ascending, ordered by their minimum member id.
    pub(super) fn components(&self, active: &BTreeSet<usize>) -> Vec<Vec<usize>> {
        let mut components = Vec::new();
        let mut seen = BTreeSet::new();
        for &start in active {
            if seen.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut frontier = vec![start];
            seen.insert(start);
            while let Some(id) = frontier.pop() {
                component.push(id);
                for &neighbour in self.neighbours(id) {
                    if seen.insert(neighbour) {
                        frontier.push(neighbour);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        // Iterating `active` ascending already yields components in
        // min-member order.
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(ids: &[usize]) -> BTreeSet<usize> {
        ids.iter().copied().collect()
    }

    #[test]
    fn merge_rewrites_references_and_deduplicates() {
        // Triangle 0-1-2 plus a pendant 3 attached to 2.
        let mut tracker = AdjacencyTracker::from_links(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]);
        tracker.merge(0, 1, 4);

        assert_eq!(tracker.neighbours(4).iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(
            tracker.neighbours(2).iter().copied().collect::<Vec<_>>(),
            vec![3, 4]
        );
        assert_eq!(tracker.neighbours(3).iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn chronological_builds_a_path() {
        let tracker = AdjacencyTracker::chronological(4);
        assert_eq!(tracker.neighbours(0).iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            tracker.neighbours(1).iter().copied().collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(
            tracker.neighbours(2).iter().copied().collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(tracker.neighbours(3).iter().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn components_are_ordered_by_minimum_member() {
        let tracker = AdjacencyTracker::from_links(5, &[(3, 4), (0, 2)]);
        let components = tracker.components(&active(&[0, 1, 2, 3, 4]));
        assert_eq!(components, vec![vec![0, 2], vec![1], vec![3, 4]]);
    }
}
