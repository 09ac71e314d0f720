//! Run orchestration for the conclust core library.
//!
//! [`Conclust`] holds a validated configuration and drives one agglomeration
//! per [`Conclust::run`] call: per-run input validation, the merge loop, and
//! assembly of the caller-facing dendrogram.

use tracing::{info, instrument, warn};

use crate::agglomerate::{self, Constraint};
use crate::dendrogram::Dendrogram;
use crate::dissimilarity::Dissimilarity;
use crate::error::ConclustError;
use crate::linkage::Linkage;
use crate::Result;

/// Beta applied when flexible linkage is selected without an explicit value.
pub(crate) const DEFAULT_FLEXIBLE_BETA: f64 = -0.25;

/// Entry point for running the clustering pipeline.
///
/// # Examples
/// ```
/// use conclust_core::{ConclustBuilder, Dissimilarity, Linkage};
///
/// // Two tight pairs joined last under single linkage.
/// let input = Dissimilarity::from_condensed(4, vec![1.0, 9.0, 9.0, 9.0, 9.0, 1.0])?;
/// let dendrogram = ConclustBuilder::new()
///     .with_method(Linkage::Single)
///     .build()?
///     .run(&input)?;
///
/// assert_eq!(dendrogram.steps().len(), 3);
/// assert_eq!(dendrogram.heights(), vec![Some(1.0), Some(1.0), Some(9.0)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Conclust {
    method: Linkage,
    beta: f64,
    constraint: Constraint,
    members: Option<Vec<f64>>,
}

impl Conclust {
    pub(crate) const fn new(
        method: Linkage,
        beta: f64,
        constraint: Constraint,
        members: Option<Vec<f64>>,
    ) -> Self {
        Self {
            method,
            beta,
            constraint,
            members,
        }
    }

    /// Returns the configured linkage method.
    #[must_use]
    pub const fn method(&self) -> Linkage {
        self.method
    }

    /// Returns the configured contiguity constraint.
    #[must_use]
    pub const fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Runs the agglomeration against a validated dissimilarity input.
    ///
    /// # Errors
    /// Returns [`ConclustError::LinkOutOfBounds`] or
    /// [`ConclustError::SelfLink`] for malformed links, and
    /// [`ConclustError::MembersLengthMismatch`] or
    /// [`ConclustError::InvalidMemberWeight`] for malformed multiplicities.
    /// Constraint-graph disconnection is not an error; it is resolved
    /// internally and surfaced through
    /// [`Dendrogram::disjoint_groups`] and a warning diagnostic.
    #[instrument(
        name = "core.run",
        err,
        skip(self, input),
        fields(
            n = input.len(),
            method = %self.method,
            constrained = self.constraint.is_constrained(),
        ),
    )]
    pub fn run(&self, input: &Dissimilarity) -> Result<Dendrogram> {
        let n = input.len();
        self.validate_links(n)?;
        self.validate_members(n)?;

        let raw = agglomerate::agglomerate(
            input,
            self.method,
            self.beta,
            &self.constraint,
            self.members.as_deref(),
        );
        let dendrogram = Dendrogram::assemble(self.method, self.constraint.clone(), n, &raw);

        let groups = dendrogram.disjoint_groups();
        if groups > 1 {
            warn!(
                disjoint_groups = groups,
                "constraint graph is disconnected; cut the dendrogram at {groups} groups to recover the components"
            );
        }
        info!(merges = dendrogram.steps().len(), "clustering completed");
        Ok(dendrogram)
    }

    fn validate_links(&self, n: usize) -> Result<()> {
        let Constraint::Links(links) = &self.constraint else {
            return Ok(());
        };
        for &(a, b) in links {
            if a == b {
                return Err(ConclustError::SelfLink { index: a });
            }
            if a >= n || b >= n {
                return Err(ConclustError::LinkOutOfBounds {
                    left: a.min(b),
                    right: a.max(b),
                    n,
                });
            }
        }
        Ok(())
    }

    fn validate_members(&self, n: usize) -> Result<()> {
        let Some(members) = self.members.as_deref() else {
            return Ok(());
        };
        if members.len() != n {
            return Err(ConclustError::MembersLengthMismatch {
                expected: n,
                got: members.len(),
            });
        }
        if let Some((index, &value)) = members
            .iter()
            .enumerate()
            .find(|(_, weight)| !weight.is_finite() || **weight <= 0.0)
        {
            return Err(ConclustError::InvalidMemberWeight { index, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConclustBuilder;

    fn input(n: usize, values: Vec<f64>) -> Dissimilarity {
        Dissimilarity::from_condensed(n, values).expect("test input is valid")
    }

    #[test]
    fn rejects_out_of_range_links_at_run_time() {
        let conclust = ConclustBuilder::new()
            .with_links(vec![(0, 3)])
            .build()
            .expect("builder must succeed");
        let err = conclust
            .run(&input(3, vec![1.0, 2.0, 3.0]))
            .expect_err("link must be rejected");
        assert_eq!(
            err,
            ConclustError::LinkOutOfBounds {
                left: 0,
                right: 3,
                n: 3
            }
        );
    }

    #[test]
    fn rejects_self_links() {
        let conclust = ConclustBuilder::new()
            .with_links(vec![(1, 1)])
            .build()
            .expect("builder must succeed");
        let err = conclust
            .run(&input(3, vec![1.0, 2.0, 3.0]))
            .expect_err("self link must be rejected");
        assert_eq!(err, ConclustError::SelfLink { index: 1 });
    }

    #[test]
    fn rejects_member_vectors_of_the_wrong_length() {
        let conclust = ConclustBuilder::new()
            .with_members(vec![1.0, 2.0])
            .build()
            .expect("builder must succeed");
        let err = conclust
            .run(&input(3, vec![1.0, 2.0, 3.0]))
            .expect_err("length mismatch must be rejected");
        assert_eq!(err, ConclustError::MembersLengthMismatch { expected: 3, got: 2 });
    }

    #[test]
    fn rejects_non_positive_member_weights() {
        let conclust = ConclustBuilder::new()
            .with_members(vec![1.0, 0.0, 1.0])
            .build()
            .expect("builder must succeed");
        let err = conclust
            .run(&input(3, vec![1.0, 2.0, 3.0]))
            .expect_err("zero weight must be rejected");
        assert!(matches!(err, ConclustError::InvalidMemberWeight { index: 1, .. }));
    }
}
