//! Constrained agglomerative hierarchical clustering.
//!
//! `conclust-core` clusters n objects described by a condensed pairwise
//! dissimilarity array, optionally under a contiguity constraint: a merge is
//! legal only when its members are connected through a caller-supplied
//! neighbour graph (explicit links, or the implicit path graph of
//! chronological clustering). The output matches the classical contract of
//! a merge sequence, per-merge heights, and a non-crossing leaf order, with
//! missing heights marking merges that had to bridge disconnected
//! constraint-graph components.
//!
//! Distances between merged clusters follow the Lance-Williams recurrence
//! for nine linkage methods; see [`Linkage`]. Tie-breaking among equally
//! minimal candidate pairs is deterministic (ascending cluster id, then
//! ascending partner id) but documented as one of several statistically
//! equivalent orders.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod agglomerate;
mod builder;
mod conclust;
mod dendrogram;
mod dissimilarity;
mod error;
mod linkage;

pub use crate::{
    agglomerate::Constraint,
    builder::ConclustBuilder,
    conclust::Conclust,
    dendrogram::{Dendrogram, MergeNode, MergeStep},
    dissimilarity::Dissimilarity,
    error::{
        ConclustError, ConclustErrorCode, DissimilarityError, DissimilarityErrorCode, Result,
    },
    linkage::{Linkage, LinkageParseError, LinkageParseErrorCode},
};
