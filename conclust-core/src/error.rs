//! Error types for the conclust core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// An error produced while validating a condensed dissimilarity input.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DissimilarityError {
    /// Clustering requires at least two observations.
    #[error("clustering requires at least 2 observations (got {n})")]
    TooFewObservations {
        /// Number of observations supplied by the caller.
        n: usize,
    },
    /// The condensed array was shorter than n(n-1)/2.
    #[error("condensed array for {n} observations requires {expected} values (got {got})")]
    TooShort {
        /// Number of observations supplied by the caller.
        n: usize,
        /// Required condensed length n(n-1)/2.
        expected: usize,
        /// Length of the array actually supplied.
        got: usize,
    },
    /// A dissimilarity value was non-finite or negative.
    #[error("dissimilarity at condensed index {index} must be finite and non-negative (got {value})")]
    InvalidValue {
        /// Condensed index of the offending value.
        index: usize,
        /// Invalid value observed at that index.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`DissimilarityError`] variants.
    enum DissimilarityErrorCode for DissimilarityError {
        /// Clustering requires at least two observations.
        TooFewObservations => TooFewObservations { .. } => "DISSIMILARITY_TOO_FEW_OBSERVATIONS",
        /// The condensed array was shorter than n(n-1)/2.
        TooShort => TooShort { .. } => "DISSIMILARITY_TOO_SHORT",
        /// A dissimilarity value was non-finite or negative.
        InvalidValue => InvalidValue { .. } => "DISSIMILARITY_INVALID_VALUE",
    }
}

/// Error type produced when configuring or running [`crate::Conclust`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConclustError {
    /// The flexible-clustering beta parameter was outside `[-1, 1)`.
    #[error("flexible beta must lie in [-1, 1) (got {beta})")]
    BetaOutOfRange {
        /// The invalid beta supplied by the caller.
        beta: f64,
    },
    /// Explicit links and the chronological constraint are mutually exclusive.
    #[error("explicit links cannot be combined with the chronological constraint")]
    ConflictingConstraints,
    /// A link connected an observation to itself.
    #[error("link ({index}, {index}) connects observation {index} to itself")]
    SelfLink {
        /// Observation index appearing on both ends of the link.
        index: usize,
    },
    /// A link referenced an observation index outside `0..n`.
    #[error("link ({left}, {right}) references an observation outside 0..{n}")]
    LinkOutOfBounds {
        /// Smaller endpoint of the offending link.
        left: usize,
        /// Larger endpoint of the offending link.
        right: usize,
        /// Number of observations in the run.
        n: usize,
    },
    /// The members vector length did not match the observation count.
    #[error("members vector has length {got} but the input has {expected} observations")]
    MembersLengthMismatch {
        /// Number of observations in the run.
        expected: usize,
        /// Length of the members vector actually supplied.
        got: usize,
    },
    /// A member weight was non-finite or not strictly positive.
    #[error("member weight for observation {index} must be finite and positive (got {value})")]
    InvalidMemberWeight {
        /// Observation whose weight was invalid.
        index: usize,
        /// Invalid weight value observed.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConclustError`] variants.
    enum ConclustErrorCode for ConclustError {
        /// The flexible-clustering beta parameter was outside `[-1, 1)`.
        BetaOutOfRange => BetaOutOfRange { .. } => "CONCLUST_BETA_OUT_OF_RANGE",
        /// Explicit links and the chronological constraint are mutually exclusive.
        ConflictingConstraints => ConflictingConstraints => "CONCLUST_CONFLICTING_CONSTRAINTS",
        /// A link connected an observation to itself.
        SelfLink => SelfLink { .. } => "CONCLUST_SELF_LINK",
        /// A link referenced an observation index outside the input range.
        LinkOutOfBounds => LinkOutOfBounds { .. } => "CONCLUST_LINK_OUT_OF_BOUNDS",
        /// The members vector length did not match the observation count.
        MembersLengthMismatch => MembersLengthMismatch { .. } => "CONCLUST_MEMBERS_LENGTH_MISMATCH",
        /// A member weight was non-finite or not strictly positive.
        InvalidMemberWeight => InvalidMemberWeight { .. } => "CONCLUST_INVALID_MEMBER_WEIGHT",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ConclustError>;
