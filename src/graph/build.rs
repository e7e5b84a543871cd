//! graph::build
//!
//! Assembly layer: factory constructors and the incremental builder.
//!
//! # Architecture
//!
//! Graphs are described to this layer in four interchangeable shapes:
//!
//! - a parent map (id -> parent ids)
//! - a child map (id -> child ids), inverted into parent form
//! - parent pairs `(id, parent_id)`
//! - child pairs `(id, child_id)`
//!
//! each with an optional explicit id set for vertices no edge
//! mentions. Every shape funnels into the same canonical constructor,
//! so normalization happens in exactly one place; the `Dag` and
//! `Tree` forms validate on the way out.
//!
//! # Example
//!
//! ```
//! use espalier::{Digraph, GraphBuilder};
//!
//! let built = GraphBuilder::new()
//!     .edge("b", "a")
//!     .edge("c", "b")
//!     .node("d")
//!     .build();
//!
//! let direct = Digraph::from_parent_pairs_with_ids(["d"], [("b", "a"), ("c", "b")]);
//! assert_eq!(built, direct);
//! ```

use super::dag::Dag;
use super::digraph::Digraph;
use super::errors::GraphError;
use super::id::{GraphId, IdMultimap};
use super::tree::Tree;
use std::collections::BTreeSet;

/// Invert an id -> id-set relation: every `(k, v)` pair becomes
/// `(v, k)`. Applying it twice drops keys that mapped to nothing.
pub fn invert<Id: GraphId>(map: &IdMultimap<Id>) -> IdMultimap<Id> {
    let mut inverted = IdMultimap::new();
    for (id, related) in map {
        for other in related {
            inverted
                .entry(other.clone())
                .or_default()
                .insert(id.clone());
        }
    }
    inverted
}

/// Collect map-shaped input, merging duplicate keys multimap-style.
fn collect_multimap<Id, M, P>(entries: M) -> IdMultimap<Id>
where
    Id: GraphId,
    M: IntoIterator<Item = (Id, P)>,
    P: IntoIterator<Item = Id>,
{
    let mut map = IdMultimap::new();
    for (id, related) in entries {
        map.entry(id).or_default().extend(related);
    }
    map
}

/// Collect pair-shaped input into a multimap.
fn collect_pairs<Id, P>(pairs: P) -> IdMultimap<Id>
where
    Id: GraphId,
    P: IntoIterator<Item = (Id, Id)>,
{
    let mut map = IdMultimap::new();
    for (id, related) in pairs {
        map.entry(id).or_default().insert(related);
    }
    map
}

impl<Id: GraphId> Digraph<Id> {
    /// Build from a parent map; the id set is inferred from the keys
    /// and values. Duplicate keys merge, and a key with an empty
    /// value set still declares its id.
    pub fn from_parent_map<M, P>(parents: M) -> Self
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Digraph::from_parts(BTreeSet::new(), collect_multimap(parents))
    }

    /// Build from a parent map plus explicitly declared ids. The
    /// stored id set is the union of both.
    pub fn from_parent_map_with_ids<I, M, P>(ids: I, parents: M) -> Self
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Digraph::from_parts(ids.into_iter().collect(), collect_multimap(parents))
    }

    /// Build from a child map (id -> its children), inverted into
    /// parent form.
    pub fn from_child_map<M, P>(children: M) -> Self
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        let child_map = collect_multimap(children);
        // Childless keys vanish under inversion; keep them as ids.
        let ids: BTreeSet<Id> = child_map.keys().cloned().collect();
        Digraph::from_parts(ids, invert(&child_map))
    }

    /// Child-map form with explicitly declared ids.
    pub fn from_child_map_with_ids<I, M, P>(ids: I, children: M) -> Self
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        let child_map = collect_multimap(children);
        let mut all_ids: BTreeSet<Id> = ids.into_iter().collect();
        all_ids.extend(child_map.keys().cloned());
        Digraph::from_parts(all_ids, invert(&child_map))
    }

    /// Build from `(id, parent_id)` pairs.
    pub fn from_parent_pairs<P>(pairs: P) -> Self
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Digraph::from_parts(BTreeSet::new(), collect_pairs(pairs))
    }

    /// Pair form with explicitly declared ids.
    pub fn from_parent_pairs_with_ids<I, P>(ids: I, pairs: P) -> Self
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Digraph::from_parts(ids.into_iter().collect(), collect_pairs(pairs))
    }

    /// Build from `(id, child_id)` pairs.
    pub fn from_child_pairs<P>(pairs: P) -> Self
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Digraph::from_parts(BTreeSet::new(), invert(&collect_pairs(pairs)))
    }

    /// Child-pair form with explicitly declared ids.
    pub fn from_child_pairs_with_ids<I, P>(ids: I, pairs: P) -> Self
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Digraph::from_parts(ids.into_iter().collect(), invert(&collect_pairs(pairs)))
    }
}

/// Validating counterparts of the [`Digraph`] factories; every form
/// fails with [`GraphError::CycleDetected`] on a cyclic relation.
impl<Id: GraphId> Dag<Id> {
    /// Validating form of [`Digraph::from_parent_map`].
    pub fn from_parent_map<M, P>(parents: M) -> Result<Self, GraphError>
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Dag::try_new(Digraph::from_parent_map(parents))
    }

    /// Validating form of [`Digraph::from_parent_map_with_ids`].
    pub fn from_parent_map_with_ids<I, M, P>(ids: I, parents: M) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Dag::try_new(Digraph::from_parent_map_with_ids(ids, parents))
    }

    /// Validating form of [`Digraph::from_child_map`].
    pub fn from_child_map<M, P>(children: M) -> Result<Self, GraphError>
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Dag::try_new(Digraph::from_child_map(children))
    }

    /// Validating form of [`Digraph::from_child_map_with_ids`].
    pub fn from_child_map_with_ids<I, M, P>(ids: I, children: M) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Dag::try_new(Digraph::from_child_map_with_ids(ids, children))
    }

    /// Validating form of [`Digraph::from_parent_pairs`].
    pub fn from_parent_pairs<P>(pairs: P) -> Result<Self, GraphError>
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Dag::try_new(Digraph::from_parent_pairs(pairs))
    }

    /// Validating form of [`Digraph::from_parent_pairs_with_ids`].
    pub fn from_parent_pairs_with_ids<I, P>(ids: I, pairs: P) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Dag::try_new(Digraph::from_parent_pairs_with_ids(ids, pairs))
    }

    /// Validating form of [`Digraph::from_child_pairs`].
    pub fn from_child_pairs<P>(pairs: P) -> Result<Self, GraphError>
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Dag::try_new(Digraph::from_child_pairs(pairs))
    }

    /// Validating form of [`Digraph::from_child_pairs_with_ids`].
    pub fn from_child_pairs_with_ids<I, P>(ids: I, pairs: P) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Dag::try_new(Digraph::from_child_pairs_with_ids(ids, pairs))
    }
}

/// Tree counterparts; validation rejects cycles first, then forests
/// and multi-parent ids with [`GraphError::TreeInvariantViolated`].
impl<Id: GraphId> Tree<Id> {
    /// Validating form of [`Digraph::from_parent_map`].
    pub fn from_parent_map<M, P>(parents: M) -> Result<Self, GraphError>
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Tree::try_from(Digraph::from_parent_map(parents))
    }

    /// Validating form of [`Digraph::from_parent_map_with_ids`].
    pub fn from_parent_map_with_ids<I, M, P>(ids: I, parents: M) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Tree::try_from(Digraph::from_parent_map_with_ids(ids, parents))
    }

    /// Validating form of [`Digraph::from_child_map`].
    pub fn from_child_map<M, P>(children: M) -> Result<Self, GraphError>
    where
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Tree::try_from(Digraph::from_child_map(children))
    }

    /// Validating form of [`Digraph::from_child_map_with_ids`].
    pub fn from_child_map_with_ids<I, M, P>(ids: I, children: M) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        M: IntoIterator<Item = (Id, P)>,
        P: IntoIterator<Item = Id>,
    {
        Tree::try_from(Digraph::from_child_map_with_ids(ids, children))
    }

    /// Validating form of [`Digraph::from_parent_pairs`].
    pub fn from_parent_pairs<P>(pairs: P) -> Result<Self, GraphError>
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Tree::try_from(Digraph::from_parent_pairs(pairs))
    }

    /// Validating form of [`Digraph::from_parent_pairs_with_ids`].
    pub fn from_parent_pairs_with_ids<I, P>(ids: I, pairs: P) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Tree::try_from(Digraph::from_parent_pairs_with_ids(ids, pairs))
    }

    /// Validating form of [`Digraph::from_child_pairs`].
    pub fn from_child_pairs<P>(pairs: P) -> Result<Self, GraphError>
    where
        P: IntoIterator<Item = (Id, Id)>,
    {
        Tree::try_from(Digraph::from_child_pairs(pairs))
    }

    /// Validating form of [`Digraph::from_child_pairs_with_ids`].
    pub fn from_child_pairs_with_ids<I, P>(ids: I, pairs: P) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = Id>,
        P: IntoIterator<Item = (Id, Id)>,
    {
        Tree::try_from(Digraph::from_child_pairs_with_ids(ids, pairs))
    }
}

/// Incremental graph assembly.
///
/// Methods consume and return the builder so construction chains;
/// nothing validates until a `build_*` call.
#[derive(Debug, Clone)]
pub struct GraphBuilder<Id> {
    ids: BTreeSet<Id>,
    parents: IdMultimap<Id>,
}

impl<Id: GraphId> GraphBuilder<Id> {
    /// Start with no ids and no edges.
    pub fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
            parents: IdMultimap::new(),
        }
    }

    /// Declare an id; harmless if edges mention it too.
    pub fn node(mut self, id: Id) -> Self {
        self.ids.insert(id);
        self
    }

    /// Declare several ids.
    pub fn nodes<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = Id>,
    {
        self.ids.extend(ids);
        self
    }

    /// Record `parent` as a parent of `child`; both become ids.
    pub fn edge(mut self, child: Id, parent: Id) -> Self {
        self.parents.entry(child).or_default().insert(parent);
        self
    }

    /// Record several `(child, parent)` edges.
    pub fn edges<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (Id, Id)>,
    {
        for (child, parent) in pairs {
            self = self.edge(child, parent);
        }
        self
    }

    /// Assemble the general graph.
    pub fn build(self) -> Digraph<Id> {
        Digraph::from_parts(self.ids, self.parents)
    }

    /// Assemble and validate as a DAG.
    pub fn build_dag(self) -> Result<Dag<Id>, GraphError> {
        Dag::try_new(self.build())
    }

    /// Assemble and validate as a tree.
    pub fn build_tree(self) -> Result<Tree<Id>, GraphError> {
        Tree::try_from(self.build())
    }
}

impl<Id: GraphId> Default for GraphBuilder<Id> {
    fn default() -> Self {
        Self::new()
    }
}
