//! Caller-facing clustering result.
//!
//! Converts the engine's raw merge records into the classical output
//! contract: a merge sequence over signed identifiers, per-merge heights
//! with missing markers, and a leaf order admitting a non-crossing
//! dendrogram layout.

use crate::agglomerate::{Constraint, RawStep};
use crate::linkage::Linkage;

/// One operand of a merge: an original observation or an earlier fusion.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MergeNode {
    /// Original observation, zero-based.
    Observation(usize),
    /// Cluster formed at the given zero-based merge step.
    Cluster(usize),
}

/// One merge event in merge order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeStep {
    left: MergeNode,
    right: MergeNode,
    height: Option<f64>,
}

impl MergeStep {
    /// Returns the first merged operand.
    #[must_use]
    pub const fn left(&self) -> MergeNode {
        self.left
    }

    /// Returns the second merged operand.
    #[must_use]
    pub const fn right(&self) -> MergeNode {
        self.right
    }

    /// Returns the recorded height, or `None` when this merge bridged two
    /// components with no path in the constraint graph.
    #[must_use]
    pub const fn height(&self) -> Option<f64> {
        self.height
    }
}

/// The assembled result of a clustering run.
///
/// # Examples
/// ```
/// use conclust_core::{ConclustBuilder, Dissimilarity, Linkage};
///
/// let input = Dissimilarity::from_condensed(3, vec![1.0, 4.0, 2.0])?;
/// let dendrogram = ConclustBuilder::new()
///     .with_method(Linkage::Single)
///     .build()?
///     .run(&input)?;
///
/// assert_eq!(dendrogram.steps().len(), 2);
/// assert_eq!(dendrogram.merge_matrix(), vec![[-1, -2], [-3, 1]]);
/// assert_eq!(dendrogram.heights(), vec![Some(1.0), Some(2.0)]);
/// assert_eq!(dendrogram.disjoint_groups(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dendrogram {
    method: Linkage,
    constraint: Constraint,
    n: usize,
    steps: Vec<MergeStep>,
    order: Vec<usize>,
    disjoint_groups: usize,
}

impl Dendrogram {
    pub(crate) fn assemble(
        method: Linkage,
        constraint: Constraint,
        n: usize,
        raw: &[RawStep],
    ) -> Self {
        let steps: Vec<MergeStep> = raw
            .iter()
            .map(|step| MergeStep {
                left: node_for(n, step.left),
                right: node_for(n, step.right),
                height: step.height,
            })
            .collect();
        let missing = steps.iter().filter(|step| step.height.is_none()).count();
        let order = leaf_order(&steps);
        Self {
            method,
            constraint,
            n,
            steps,
            order,
            disjoint_groups: missing + 1,
        }
    }

    /// Returns the linkage method the run was configured with.
    #[must_use]
    pub const fn method(&self) -> Linkage {
        self.method
    }

    /// Returns the contiguity constraint the run was configured with, for
    /// downstream rendering collaborators.
    #[must_use]
    pub const fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns the number of clustered observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Returns whether the dendrogram covers no observations. Runs require
    /// at least two observations, so this is always false.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the n-1 merge events in merge order.
    #[must_use]
    pub fn steps(&self) -> &[MergeStep] {
        &self.steps
    }

    /// Returns the heights in merge order; `None` marks a merge that
    /// bridged disconnected components.
    #[must_use]
    pub fn heights(&self) -> Vec<Option<f64>> {
        self.steps.iter().map(MergeStep::height).collect()
    }

    /// Returns the merge sequence in the classical signed encoding:
    /// `-(i + 1)` for observation `i`, `s + 1` for the cluster formed at
    /// step `s`.
    #[must_use]
    pub fn merge_matrix(&self) -> Vec<[i64; 2]> {
        self.steps
            .iter()
            .map(|step| [signed(step.left), signed(step.right)])
            .collect()
    }

    /// Returns the leaf permutation giving a non-crossing layout.
    #[must_use]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Returns the number of disjoint constraint-graph components the run
    /// encountered (missing-height count + 1); cutting the tree into this
    /// many groups recovers them exactly.
    #[must_use]
    pub const fn disjoint_groups(&self) -> usize {
        self.disjoint_groups
    }
}

const fn node_for(n: usize, id: usize) -> MergeNode {
    if id < n {
        MergeNode::Observation(id)
    } else {
        MergeNode::Cluster(id - n)
    }
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "merge counts are bounded far below i64::MAX"
)]
const fn signed(node: MergeNode) -> i64 {
    match node {
        MergeNode::Observation(index) => -(index as i64) - 1,
        MergeNode::Cluster(step) => step as i64 + 1,
    }
}

/// In-order traversal of the final binary tree; the last step is the root
/// because every earlier cluster is eventually consumed by a later merge.
fn leaf_order(steps: &[MergeStep]) -> Vec<usize> {
    let Some(root) = steps.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut order = Vec::new();
    let mut stack = vec![MergeNode::Cluster(root)];
    while let Some(node) = stack.pop() {
        match node {
            MergeNode::Observation(index) => order.push(index),
            MergeNode::Cluster(step) => {
                // Right first so the left subtree is emitted first.
                stack.push(steps[step].right);
                stack.push(steps[step].left);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agglomerate::RawStep;

    fn raw(left: usize, right: usize, height: Option<f64>) -> RawStep {
        RawStep {
            left,
            right,
            height,
        }
    }

    #[test]
    fn assembles_signed_merges_and_order() {
        // n = 4: merge (1,2), then (0, that), then (3, that).
        let steps = [
            raw(1, 2, Some(0.5)),
            raw(0, 4, Some(1.0)),
            raw(3, 5, Some(2.0)),
        ];
        let dendrogram =
            Dendrogram::assemble(Linkage::Average, Constraint::Unconstrained, 4, &steps);

        assert_eq!(
            dendrogram.merge_matrix(),
            vec![[-2, -3], [-1, 1], [-4, 2]]
        );
        assert_eq!(dendrogram.order(), &[3, 0, 1, 2]);
        assert_eq!(dendrogram.disjoint_groups(), 1);
    }

    #[test]
    fn counts_missing_heights_as_extra_groups() {
        let steps = [raw(0, 1, Some(1.0)), raw(2, 3, None)];
        let dendrogram =
            Dendrogram::assemble(Linkage::Single, Constraint::Chronological, 3, &steps);
        assert_eq!(dendrogram.heights(), vec![Some(1.0), None]);
        assert_eq!(dendrogram.disjoint_groups(), 2);
    }
}
