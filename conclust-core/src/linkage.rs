//! Linkage method table for the agglomeration engine.
//!
//! Each method maps to the four Lance-Williams coefficients used to update
//! the distance from a freshly merged cluster to every other active cluster:
//!
//! ```text
//! d(C, K) = aL·d(A, K) + aR·d(B, K) + b·d(A, B) + g·|d(A, K) − d(B, K)|
//! ```
//!
//! Methods also declare the space they operate in: `ward.D2`, `centroid`,
//! and `median` update squared distances, so inputs are squared on entry.
//! Only `ward.D2` square-roots back when a height is recorded; `centroid`
//! and `median` expose squared-space heights by convention.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::define_error_codes;

/// Agglomeration criteria supported by the engine.
///
/// Method names parse by unambiguous prefix, mirroring the selector
/// behaviour callers of the classical interface expect. An exact name always
/// wins, so `"ward.D"` selects [`Linkage::WardD`] even though it is also a
/// prefix of `"ward.D2"`.
///
/// # Examples
/// ```
/// use conclust_core::Linkage;
///
/// assert_eq!("comp".parse::<Linkage>()?, Linkage::Complete);
/// assert_eq!("ward.D".parse::<Linkage>()?, Linkage::WardD);
/// assert!("ward".parse::<Linkage>().is_err());
/// # Ok::<(), conclust_core::LinkageParseError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Linkage {
    /// Nearest-neighbour linkage.
    Single,
    /// Furthest-neighbour linkage.
    Complete,
    /// Group-average linkage (UPGMA).
    Average,
    /// Weighted-average linkage (WPGMA).
    McQuitty,
    /// Ward's minimum-variance criterion on raw dissimilarities.
    WardD,
    /// Ward's criterion on squared dissimilarities with heights restored to
    /// the input scale.
    WardD2,
    /// Unweighted centroid linkage (UPGMC); heights are in squared space.
    Centroid,
    /// Weighted centroid linkage (WPGMC); heights are in squared space.
    Median,
    /// Beta-flexible linkage; the beta parameter tunes chaining versus
    /// clumping tendency.
    Flexible,
}

/// Canonical method names in selector order.
const METHOD_NAMES: [(&str, Linkage); 9] = [
    ("ward.D", Linkage::WardD),
    ("ward.D2", Linkage::WardD2),
    ("single", Linkage::Single),
    ("complete", Linkage::Complete),
    ("average", Linkage::Average),
    ("mcquitty", Linkage::McQuitty),
    ("centroid", Linkage::Centroid),
    ("median", Linkage::Median),
    ("flexible", Linkage::Flexible),
];

impl Linkage {
    /// Returns the canonical method name.
    ///
    /// # Examples
    /// ```
    /// use conclust_core::Linkage;
    ///
    /// assert_eq!(Linkage::WardD2.as_str(), "ward.D2");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Complete => "complete",
            Self::Average => "average",
            Self::McQuitty => "mcquitty",
            Self::WardD => "ward.D",
            Self::WardD2 => "ward.D2",
            Self::Centroid => "centroid",
            Self::Median => "median",
            Self::Flexible => "flexible",
        }
    }

    /// Returns whether the method consumes the flexible beta parameter.
    #[must_use]
    pub const fn uses_beta(self) -> bool {
        matches!(self, Self::Flexible)
    }

    pub(crate) const fn space(self) -> DistanceSpace {
        match self {
            Self::WardD2 => DistanceSpace::Squared { sqrt_heights: true },
            Self::Centroid | Self::Median => DistanceSpace::Squared {
                sqrt_heights: false,
            },
            _ => DistanceSpace::Linear,
        }
    }

    /// Computes the Lance-Williams coefficients for merging clusters of
    /// weight `n_left` and `n_right` relative to another active cluster of
    /// weight `n_other`.
    pub(crate) fn coefficients(self, n_left: f64, n_right: f64, n_other: f64, beta: f64) -> Coefficients {
        match self {
            Self::Single => Coefficients::new(0.5, 0.5, 0.0, -0.5),
            Self::Complete => Coefficients::new(0.5, 0.5, 0.0, 0.5),
            Self::Average => {
                let total = n_left + n_right;
                Coefficients::new(n_left / total, n_right / total, 0.0, 0.0)
            }
            Self::McQuitty => Coefficients::new(0.5, 0.5, 0.0, 0.0),
            Self::WardD | Self::WardD2 => {
                let total = n_left + n_right + n_other;
                Coefficients::new(
                    (n_left + n_other) / total,
                    (n_right + n_other) / total,
                    -n_other / total,
                    0.0,
                )
            }
            Self::Centroid => {
                let total = n_left + n_right;
                Coefficients::new(
                    n_left / total,
                    n_right / total,
                    -(n_left * n_right) / (total * total),
                    0.0,
                )
            }
            Self::Median => Coefficients::new(0.5, 0.5, -0.25, 0.0),
            Self::Flexible => {
                let alpha = (1.0 - beta) / 2.0;
                Coefficients::new(alpha, alpha, beta, 0.0)
            }
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while parsing a linkage method selector.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LinkageParseError {
    /// The selector matched no known method name.
    #[error("unknown linkage method `{name}`")]
    Unknown {
        /// Selector supplied by the caller.
        name: String,
    },
    /// The selector was a prefix of more than one method name.
    #[error("ambiguous linkage method `{name}`: matches {}", matches.join(", "))]
    Ambiguous {
        /// Selector supplied by the caller.
        name: String,
        /// Canonical names the selector is a prefix of.
        matches: Vec<&'static str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`LinkageParseError`] variants.
    enum LinkageParseErrorCode for LinkageParseError {
        /// The selector matched no known method name.
        Unknown => Unknown { .. } => "LINKAGE_UNKNOWN_METHOD",
        /// The selector was a prefix of more than one method name.
        Ambiguous => Ambiguous { .. } => "LINKAGE_AMBIGUOUS_METHOD",
    }
}

impl FromStr for Linkage {
    type Err = LinkageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(&(_, method)) = METHOD_NAMES.iter().find(|(name, _)| *name == s) {
            return Ok(method);
        }
        if s.is_empty() {
            return Err(LinkageParseError::Unknown { name: String::new() });
        }

        let matches: Vec<(&'static str, Self)> = METHOD_NAMES
            .iter()
            .filter(|(name, _)| name.starts_with(s))
            .copied()
            .collect();
        match matches.as_slice() {
            [] => Err(LinkageParseError::Unknown { name: s.to_owned() }),
            [(_, method)] => Ok(*method),
            _ => Err(LinkageParseError::Ambiguous {
                name: s.to_owned(),
                matches: matches.iter().map(|(name, _)| *name).collect(),
            }),
        }
    }
}

/// The recurrence coefficients for one merge, in the method's own space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Coefficients {
    pub(crate) alpha_left: f64,
    pub(crate) alpha_right: f64,
    pub(crate) beta: f64,
    pub(crate) gamma: f64,
}

impl Coefficients {
    const fn new(alpha_left: f64, alpha_right: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha_left,
            alpha_right,
            beta,
            gamma,
        }
    }

    /// Applies the recurrence to the parents' distances to another cluster.
    pub(crate) fn combine(self, d_left: f64, d_right: f64, d_between: f64) -> f64 {
        self.alpha_left * d_left
            + self.alpha_right * d_right
            + self.beta * d_between
            + self.gamma * (d_left - d_right).abs()
    }
}

/// Space a method's recurrence operates in.
///
/// Squared-space methods square dissimilarities on entry; `sqrt_heights`
/// restores recorded heights to the input scale (`ward.D2` only).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DistanceSpace {
    Linear,
    Squared { sqrt_heights: bool },
}

impl DistanceSpace {
    /// Transforms an input dissimilarity into the working space.
    pub(crate) fn on_input(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Squared { .. } => value * value,
        }
    }

    /// Transforms a working-space distance into a recorded height.
    pub(crate) fn on_record(self, value: f64) -> f64 {
        match self {
            Self::Linear | Self::Squared { sqrt_heights: false } => value,
            Self::Squared { sqrt_heights: true } => value.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("single", Linkage::Single)]
    #[case("s", Linkage::Single)]
    #[case("complete", Linkage::Complete)]
    #[case("co", Linkage::Complete)]
    #[case("a", Linkage::Average)]
    #[case("mc", Linkage::McQuitty)]
    #[case("ward.D", Linkage::WardD)]
    #[case("ward.D2", Linkage::WardD2)]
    #[case("f", Linkage::Flexible)]
    fn parses_unambiguous_prefixes(#[case] input: &str, #[case] expected: Linkage) {
        assert_eq!(input.parse::<Linkage>(), Ok(expected));
    }

    #[rstest]
    #[case("ward")]
    #[case("w")]
    #[case("c")]
    #[case("m")]
    fn rejects_ambiguous_prefixes(#[case] input: &str) {
        let err = input.parse::<Linkage>().expect_err("prefix must be ambiguous");
        assert!(matches!(err, LinkageParseError::Ambiguous { .. }), "got {err:?}");
    }

    #[rstest]
    #[case("")]
    #[case("wardd2")]
    #[case("Complete")]
    #[case("centroidal")]
    fn rejects_unknown_selectors(#[case] input: &str) {
        let err = input.parse::<Linkage>().expect_err("selector must be unknown");
        assert!(matches!(err, LinkageParseError::Unknown { .. }), "got {err:?}");
    }

    #[test]
    fn ward_coefficients_follow_cluster_weights() {
        let c = Linkage::WardD.coefficients(2.0, 3.0, 5.0, 0.0);
        assert!((c.alpha_left - 0.7).abs() < 1e-12);
        assert!((c.alpha_right - 0.8).abs() < 1e-12);
        assert!((c.beta + 0.5).abs() < 1e-12);
        assert_eq!(c.gamma, 0.0);
    }

    #[test]
    fn centroid_penalty_uses_squared_total() {
        let c = Linkage::Centroid.coefficients(1.0, 3.0, 7.0, 0.0);
        assert!((c.alpha_left - 0.25).abs() < 1e-12);
        assert!((c.alpha_right - 0.75).abs() < 1e-12);
        assert!((c.beta + 3.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn flexible_coefficients_split_the_beta_complement() {
        let c = Linkage::Flexible.coefficients(4.0, 1.0, 2.0, -0.25);
        assert!((c.alpha_left - 0.625).abs() < 1e-12);
        assert!((c.alpha_right - 0.625).abs() < 1e-12);
        assert!((c.beta + 0.25).abs() < 1e-12);
    }

    #[test]
    fn single_linkage_combines_to_the_minimum() {
        let c = Linkage::Single.coefficients(1.0, 1.0, 1.0, 0.0);
        assert!((c.combine(2.0, 5.0, 9.0) - 2.0).abs() < 1e-12);
        let complete = Linkage::Complete.coefficients(1.0, 1.0, 1.0, 0.0);
        assert!((complete.combine(2.0, 5.0, 9.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn ward_d2_space_restores_input_scale() {
        let space = Linkage::WardD2.space();
        assert_eq!(space.on_input(3.0), 9.0);
        assert!((space.on_record(9.0) - 3.0).abs() < 1e-12);
        assert_eq!(Linkage::Centroid.space().on_record(9.0), 9.0);
    }
}
