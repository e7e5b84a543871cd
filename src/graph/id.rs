//! graph::id
//!
//! Shared bounds and aliases for graph identifiers.
//!
//! # Types
//!
//! - [`GraphId`] - Blanket bound collected by every graph type
//! - [`IdMultimap`] - The id -> id-set map shape used for parent and
//!   child relations
//!
//! # Design
//!
//! Graphs are keyed by caller-supplied value types rather than by
//! wrapped node objects. `Ord` is part of the bound so that stored
//! sets iterate deterministically and the topological tie-break is
//! well defined without an extra sort. `Hash` feeds traversal visited
//! sets, and `Debug` lets validation errors name the offending id.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Bounds required of a graph identifier.
///
/// Blanket-implemented for every eligible type; callers never
/// implement this by hand.
///
/// # Examples
///
/// ```
/// use espalier::Digraph;
///
/// // &str, integers, and other ordered/hashable values all qualify.
/// let g = Digraph::from_parent_pairs([("child", "parent")]);
/// assert_eq!(g.id_count(), 2);
/// ```
pub trait GraphId: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> GraphId for T {}

/// An id -> set-of-ids relation, the storage form of parent and child
/// maps.
///
/// Ordered maps keep every derived view deterministic: iteration,
/// serialization, and error reporting all observe ascending id order.
pub type IdMultimap<Id> = BTreeMap<Id, BTreeSet<Id>>;
