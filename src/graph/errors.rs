//! graph::errors
//!
//! Errors raised while constructing refined graph types.
//!
//! # Design
//!
//! Validation happens once, at construction: a [`Dag`](crate::Dag) or
//! [`Tree`](crate::Tree) that exists is known to satisfy its
//! invariants, so every read operation is total. Queries never return
//! errors; asking about an unknown id yields an empty result instead.

use thiserror::Error;

/// Errors from graph construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The parent relation contains a cycle, so no topological order
    /// exists and the graph cannot be a DAG.
    #[error("cycle detected in parent relation")]
    CycleDetected,

    /// The graph is acyclic but not tree-shaped; the reason names the
    /// violated condition and the offending id where there is one.
    #[error("tree invariant violated: {0}")]
    TreeInvariantViolated(String),
}
