//! Builder utilities for configuring clustering runs.
//!
//! Collects the method, flexible beta, contiguity constraint, and initial
//! multiplicities, and validates the combination before constructing a
//! [`Conclust`] runner.

use tracing::warn;

use crate::agglomerate::Constraint;
use crate::conclust::{Conclust, DEFAULT_FLEXIBLE_BETA};
use crate::error::ConclustError;
use crate::linkage::Linkage;
use crate::Result;

/// Configures and constructs [`Conclust`] instances.
///
/// # Examples
/// ```
/// use conclust_core::{ConclustBuilder, Linkage};
///
/// let conclust = ConclustBuilder::new()
///     .with_method(Linkage::WardD2)
///     .with_links(vec![(0, 1), (1, 2)])
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(conclust.method(), Linkage::WardD2);
/// assert!(conclust.constraint().is_constrained());
/// ```
#[derive(Clone, Debug)]
pub struct ConclustBuilder {
    method: Linkage,
    beta: Option<f64>,
    links: Option<Vec<(usize, usize)>>,
    chronological: bool,
    members: Option<Vec<f64>>,
}

impl Default for ConclustBuilder {
    fn default() -> Self {
        Self {
            method: Linkage::Complete,
            beta: None,
            links: None,
            chronological: false,
            members: None,
        }
    }
}

impl ConclustBuilder {
    /// Creates a builder populated with default parameters: complete
    /// linkage, unconstrained, unit multiplicities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the linkage method.
    #[must_use]
    pub const fn with_method(mut self, method: Linkage) -> Self {
        self.method = method;
        self
    }

    /// Returns the configured linkage method.
    #[must_use]
    pub const fn method(&self) -> Linkage {
        self.method
    }

    /// Sets the beta parameter for flexible clustering. Must lie in
    /// `[-1, 1)`; defaults to -0.25 when flexible linkage is selected
    /// without an explicit beta.
    #[must_use]
    pub const fn with_beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }

    /// Constrains merges to pairs connected through the given zero-based
    /// observation links. Mutually exclusive with [`Self::chronological`].
    #[must_use]
    pub fn with_links(mut self, links: Vec<(usize, usize)>) -> Self {
        self.links = Some(links);
        self
    }

    /// Constrains merges to the implicit path graph over the observation
    /// order. Mutually exclusive with [`Self::with_links`].
    #[must_use]
    pub const fn chronological(mut self) -> Self {
        self.chronological = true;
        self
    }

    /// Sets per-observation initial multiplicities, enabling runs that
    /// start from pre-aggregated clusters. Defaults to 1 per observation.
    #[must_use]
    pub fn with_members(mut self, members: Vec<f64>) -> Self {
        self.members = Some(members);
        self
    }

    /// Validates the configuration and constructs a [`Conclust`] runner.
    ///
    /// # Errors
    /// Returns [`ConclustError::BetaOutOfRange`] when beta lies outside
    /// `[-1, 1)` and [`ConclustError::ConflictingConstraints`] when both
    /// explicit links and the chronological constraint are requested.
    pub fn build(self) -> Result<Conclust> {
        if let Some(beta) = self.beta {
            if !(-1.0..1.0).contains(&beta) {
                return Err(ConclustError::BetaOutOfRange { beta });
            }
            if !self.method.uses_beta() {
                warn!(
                    method = %self.method,
                    beta,
                    "beta only affects flexible linkage; ignoring it"
                );
            }
        }

        let constraint = match (self.links, self.chronological) {
            (Some(_), true) => return Err(ConclustError::ConflictingConstraints),
            (Some(links), false) => Constraint::Links(links),
            (None, true) => Constraint::Chronological,
            (None, false) => Constraint::Unconstrained,
        };

        let beta = self.beta.unwrap_or(DEFAULT_FLEXIBLE_BETA);
        Ok(Conclust::new(self.method, beta, constraint, self.members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unconstrained_complete_linkage() {
        let conclust = ConclustBuilder::new().build().expect("defaults are valid");
        assert_eq!(conclust.method(), Linkage::Complete);
        assert!(!conclust.constraint().is_constrained());
    }

    #[test]
    fn rejects_beta_outside_the_half_open_interval() {
        for beta in [-1.5, 1.0, f64::NAN] {
            let err = ConclustBuilder::new()
                .with_method(Linkage::Flexible)
                .with_beta(beta)
                .build()
                .expect_err("beta must be rejected");
            assert!(matches!(err, ConclustError::BetaOutOfRange { .. }), "beta {beta}");
        }
    }

    #[test]
    fn accepts_the_beta_boundary_values() {
        for beta in [-1.0, 0.0, 0.999] {
            assert!(
                ConclustBuilder::new()
                    .with_method(Linkage::Flexible)
                    .with_beta(beta)
                    .build()
                    .is_ok(),
                "beta {beta} lies in [-1, 1)"
            );
        }
    }

    #[test]
    fn rejects_links_combined_with_chronological() {
        let err = ConclustBuilder::new()
            .with_links(vec![(0, 1)])
            .chronological()
            .build()
            .expect_err("constraints are mutually exclusive");
        assert_eq!(err, ConclustError::ConflictingConstraints);
    }
}
