//! Agglomerative merge computation.
//!
//! This module owns the run-time data structures of a clustering run: the
//! working distance store (mutated in place through the Lance-Williams
//! recurrence), the contiguity tracker for constrained runs, and the merge
//! engine that drives n-1 fusions. The output is a flat list of raw merge
//! records over arena ids (`0..n` observations, `n..2n-1` fusions in merge
//! order); shaping them into the caller-facing dendrogram happens in
//! [`crate::dendrogram`].

mod adjacency;
mod engine;
mod store;

use crate::dissimilarity::Dissimilarity;
use crate::linkage::Linkage;

use self::engine::MergeEngine;

/// Contiguity constraint applied to a run.
///
/// # Examples
/// ```
/// use conclust_core::Constraint;
///
/// let links = Constraint::Links(vec![(0, 1), (1, 2)]);
/// assert!(links.is_constrained());
/// assert!(!Constraint::Unconstrained.is_constrained());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Constraint {
    /// Every pair of active clusters is a legal merge candidate.
    #[default]
    Unconstrained,
    /// Only pairs connected through the given zero-based observation links
    /// (and their fusions) may merge.
    Links(Vec<(usize, usize)>),
    /// Implicit path graph over the observation order: `i` is adjacent to
    /// `i + 1` only.
    Chronological,
}

impl Constraint {
    /// Returns whether the run tracks a contiguity graph.
    #[must_use]
    pub const fn is_constrained(&self) -> bool {
        !matches!(self, Self::Unconstrained)
    }
}

/// One merge over arena ids, in merge order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RawStep {
    /// Arena id of the first retired cluster.
    pub(crate) left: usize,
    /// Arena id of the second retired cluster.
    pub(crate) right: usize,
    /// Recorded height; `None` exactly when the merge bridged two
    /// disconnected components.
    pub(crate) height: Option<f64>,
}

/// Runs the full agglomeration and returns the n-1 raw merge records.
///
/// Inputs must already be validated: links in range and irreflexive,
/// members (when given) of length n with positive finite weights, beta in
/// range for flexible linkage.
pub(crate) fn agglomerate(
    input: &Dissimilarity,
    method: Linkage,
    beta: f64,
    constraint: &Constraint,
    members: Option<&[f64]>,
) -> Vec<RawStep> {
    MergeEngine::new(input, method, beta, constraint, members).run()
}
