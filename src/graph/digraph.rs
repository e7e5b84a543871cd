//! graph::digraph
//!
//! General immutable directed graph keyed by ids.
//!
//! # Architecture
//!
//! The parent map (id -> set of parent ids) is the single source of
//! truth. Everything else is derived from it at construction: the
//! child map is its exact inverse, roots are the ids with no parents,
//! leaves the ids with no children. The topological order is derived
//! lazily and cached, which immutability makes safe: a cache entry is
//! written at most once and can never go stale.
//!
//! Cycles are allowed here. [`Dag`](crate::Dag) and
//! [`Tree`](crate::Tree) layer validation on top of this type rather
//! than duplicating its queries.
//!
//! # Invariants
//!
//! - Every id mentioned anywhere in the parent map is in `ids()`.
//! - Child map, root set, and leaf set are consistent with the parent
//!   map at all times.
//! - Queries are total: an unknown id has empty parents, children, and
//!   closures, never an error.
//!
//! # Example
//!
//! ```
//! use espalier::Digraph;
//!
//! let g = Digraph::from_parent_pairs([("b", "a"), ("c", "b")]);
//! assert!(g.root_ids().contains("a"));
//! assert_eq!(g.ancestor_ids(["c"], false), ["a", "b"].into());
//! assert_eq!(g.topsort_ids().map(|ids| ids.to_vec()), Some(vec!["a", "b", "c"]));
//! ```

use super::id::{GraphId, IdMultimap};
use super::traverse::{Order, Traversal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::fmt;
use std::sync::OnceLock;

/// An immutable directed graph over bare ids.
///
/// Construct through the factory functions (`from_parent_map` and
/// friends) or [`GraphBuilder`](crate::GraphBuilder). Two graphs are
/// equal when their id sets and parent maps are equal; derived state
/// never participates.
#[derive(Clone)]
pub struct Digraph<Id> {
    /// All vertex ids, including ids that appear only as someone's
    /// parent.
    ids: BTreeSet<Id>,
    /// Ground truth: id -> parent ids. Ids without parents carry no
    /// entry.
    parents: IdMultimap<Id>,
    /// Derived inverse of `parents`.
    children: IdMultimap<Id>,
    roots: BTreeSet<Id>,
    leaves: BTreeSet<Id>,
    /// Kahn order, computed on first request. `None` once computed
    /// means the graph is cyclic.
    topo: OnceLock<Option<Vec<Id>>>,
    /// Shared empty set backing unknown-id lookups.
    empty: BTreeSet<Id>,
}

impl<Id: GraphId> Digraph<Id> {
    /// Canonical constructor: normalize and derive.
    ///
    /// The stored id set is the union of `ids` with every key and
    /// value of `parents`, so a parent map referencing an id nobody
    /// declared still produces a closed graph. Empty parent sets are
    /// dropped from storage; absence and emptiness are one state.
    pub(crate) fn from_parts(ids: BTreeSet<Id>, parents: IdMultimap<Id>) -> Self {
        let mut all_ids = ids;
        let mut parent_map = IdMultimap::new();
        for (id, parent_ids) in parents {
            all_ids.insert(id.clone());
            if parent_ids.is_empty() {
                continue;
            }
            for parent_id in &parent_ids {
                all_ids.insert(parent_id.clone());
            }
            parent_map.insert(id, parent_ids);
        }

        let mut children = IdMultimap::new();
        for (id, parent_ids) in &parent_map {
            for parent_id in parent_ids {
                children
                    .entry(parent_id.clone())
                    .or_default()
                    .insert(id.clone());
            }
        }

        let roots = all_ids
            .iter()
            .filter(|id| !parent_map.contains_key(*id))
            .cloned()
            .collect();
        let leaves = all_ids
            .iter()
            .filter(|id| !children.contains_key(*id))
            .cloned()
            .collect();

        Self {
            ids: all_ids,
            parents: parent_map,
            children,
            roots,
            leaves,
            topo: OnceLock::new(),
            empty: BTreeSet::new(),
        }
    }

    /// All ids in the graph, in ascending order.
    pub fn ids(&self) -> &BTreeSet<Id> {
        &self.ids
    }

    /// Number of ids in the graph.
    pub fn id_count(&self) -> usize {
        self.ids.len()
    }

    /// Whether `id` is a vertex of this graph.
    pub fn contains_id(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    /// Direct parents of `id`; empty for roots and unknown ids.
    pub fn parent_ids(&self, id: &Id) -> &BTreeSet<Id> {
        self.parents.get(id).unwrap_or(&self.empty)
    }

    /// Direct children of `id`; empty for leaves and unknown ids.
    pub fn child_ids(&self, id: &Id) -> &BTreeSet<Id> {
        self.children.get(id).unwrap_or(&self.empty)
    }

    /// The full id -> parents relation. Ids without parents are absent.
    pub fn parent_map(&self) -> &IdMultimap<Id> {
        &self.parents
    }

    /// The full id -> children relation, always the inverse of
    /// [`parent_map`](Self::parent_map).
    pub fn child_map(&self) -> &IdMultimap<Id> {
        &self.children
    }

    /// Ids with no parents.
    pub fn root_ids(&self) -> &BTreeSet<Id> {
        &self.roots
    }

    /// Ids with no children.
    pub fn leaf_ids(&self) -> &BTreeSet<Id> {
        &self.leaves
    }

    /// Whether `candidate` is a direct parent of `id`.
    pub fn is_parent_of(&self, candidate: &Id, id: &Id) -> bool {
        self.parent_ids(id).contains(candidate)
    }

    /// Whether `candidate` is a direct child of `id`.
    pub fn is_child_of(&self, candidate: &Id, id: &Id) -> bool {
        self.child_ids(id).contains(candidate)
    }

    /// Whether `candidate` is reachable from `id` through parent
    /// edges. Stops walking as soon as the candidate is found.
    pub fn is_ancestor_of(&self, candidate: &Id, id: &Id, inclusive: bool) -> bool {
        self.traverse(Order::DepthFirst, inclusive, [id.clone()], self.parent_expand())
            .any(|current| current == *candidate)
    }

    /// Whether `candidate` is reachable from `id` through child edges.
    pub fn is_descendant_of(&self, candidate: &Id, id: &Id, inclusive: bool) -> bool {
        self.traverse(Order::DepthFirst, inclusive, [id.clone()], self.child_expand())
            .any(|current| current == *candidate)
    }

    /// Expansion function for walking toward roots, for use with
    /// [`traverse`](Self::traverse).
    pub fn parent_expand(&self) -> impl Fn(&Id) -> Vec<Id> + '_ {
        move |id| self.parent_ids(id).iter().cloned().collect()
    }

    /// Expansion function for walking toward leaves.
    pub fn child_expand(&self) -> impl Fn(&Id) -> Vec<Id> + '_ {
        move |id| self.child_ids(id).iter().cloned().collect()
    }

    /// Lazy traversal from `starts` under an arbitrary expansion
    /// function. See [`Traversal`] for the ordering and dedup rules.
    pub fn traverse<I, F>(
        &self,
        order: Order,
        include_starts: bool,
        starts: I,
        expand: F,
    ) -> Traversal<Id, F>
    where
        I: IntoIterator<Item = Id>,
        F: FnMut(&Id) -> Vec<Id>,
    {
        Traversal::new(order, include_starts, starts, expand)
    }

    /// Materialized form of [`traverse`](Self::traverse). Recomputed
    /// on every call; callers wanting repeat access keep the list.
    pub fn walk<I, F>(&self, order: Order, include_starts: bool, starts: I, expand: F) -> Vec<Id>
    where
        I: IntoIterator<Item = Id>,
        F: FnMut(&Id) -> Vec<Id>,
    {
        self.traverse(order, include_starts, starts, expand).collect()
    }

    /// Every id reachable from `starts` through parent edges. With
    /// `inclusive` the starts themselves are part of the result.
    pub fn ancestor_ids<I>(&self, starts: I, inclusive: bool) -> BTreeSet<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        self.traverse(Order::DepthFirst, inclusive, starts, self.parent_expand())
            .collect()
    }

    /// Every id reachable from `starts` through child edges.
    pub fn descendant_ids<I>(&self, starts: I, inclusive: bool) -> BTreeSet<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        self.traverse(Order::DepthFirst, inclusive, starts, self.child_expand())
            .collect()
    }

    /// The subgraph induced by the ancestor closure of `starts`: its
    /// ids are exactly `ancestor_ids(starts, inclusive)` and its edges
    /// are the original edges with both endpoints inside the closure.
    pub fn ancestor_graph<I>(&self, starts: I, inclusive: bool) -> Digraph<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        let closure = self.ancestor_ids(starts, inclusive);
        let parents = self.filter_parent_map(&closure);
        Digraph::from_parts(closure, parents)
    }

    /// The subgraph induced by the descendant closure of `starts`.
    pub fn descendant_graph<I>(&self, starts: I, inclusive: bool) -> Digraph<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        let closure = self.descendant_ids(starts, inclusive);
        let parents = self.filter_parent_map(&closure);
        Digraph::from_parts(closure, parents)
    }

    /// Restriction of the parent map to edges with both endpoints in
    /// `keep`. Entries left without parents are dropped.
    pub fn filter_parent_map(&self, keep: &BTreeSet<Id>) -> IdMultimap<Id> {
        let mut filtered = IdMultimap::new();
        for (id, parent_ids) in &self.parents {
            if !keep.contains(id) {
                continue;
            }
            let kept: BTreeSet<Id> = parent_ids
                .iter()
                .filter(|parent_id| keep.contains(*parent_id))
                .cloned()
                .collect();
            if !kept.is_empty() {
                filtered.insert(id.clone(), kept);
            }
        }
        filtered
    }

    /// Whether the parent relation contains a cycle. Computed once and
    /// cached alongside [`topsort_ids`](Self::topsort_ids).
    pub fn contains_cycle(&self) -> bool {
        self.topsort_ids().is_none()
    }

    /// Topological order of all ids, parents strictly before children;
    /// `None` iff the graph is cyclic.
    ///
    /// Among the ids ready at any step the smallest is placed first,
    /// so the order is fully deterministic.
    pub fn topsort_ids(&self) -> Option<&[Id]> {
        self.topo.get_or_init(|| self.kahn_order()).as_deref()
    }

    /// Kahn's algorithm with an ascending-id ready heap.
    fn kahn_order(&self) -> Option<Vec<Id>> {
        let mut pending: BTreeMap<Id, usize> = self
            .ids
            .iter()
            .map(|id| (id.clone(), self.parent_ids(id).len()))
            .collect();
        let mut ready: BinaryHeap<Reverse<Id>> = pending
            .iter()
            .filter(|(_, unplaced)| **unplaced == 0)
            .map(|(id, _)| Reverse(id.clone()))
            .collect();

        let mut order = Vec::with_capacity(self.ids.len());
        while let Some(Reverse(id)) = ready.pop() {
            for child in self.child_ids(&id) {
                if let Some(unplaced) = pending.get_mut(child) {
                    *unplaced -= 1;
                    if *unplaced == 0 {
                        ready.push(Reverse(child.clone()));
                    }
                }
            }
            order.push(id);
        }

        // Ids still waiting on a parent at exhaustion sit on a cycle.
        if order.len() == self.ids.len() {
            Some(order)
        } else {
            None
        }
    }
}

impl<Id: GraphId> PartialEq for Digraph<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids && self.parents == other.parents
    }
}

impl<Id: GraphId> Eq for Digraph<Id> {}

impl<Id: GraphId> fmt::Debug for Digraph<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digraph")
            .field("ids", &self.ids)
            .field("parents", &self.parents)
            .finish()
    }
}

/// Wire form: the two fields that define a graph.
#[derive(Serialize)]
struct RawDigraphRef<'a, Id: Ord> {
    ids: &'a BTreeSet<Id>,
    parents: &'a IdMultimap<Id>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDigraph<Id: Ord> {
    ids: BTreeSet<Id>,
    parents: IdMultimap<Id>,
}

impl<Id> Serialize for Digraph<Id>
where
    Id: GraphId + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawDigraphRef {
            ids: &self.ids,
            parents: &self.parents,
        }
        .serialize(serializer)
    }
}

impl<'de, Id> Deserialize<'de> for Digraph<Id>
where
    Id: GraphId + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDigraph::deserialize(deserializer)?;
        Ok(Digraph::from_parts(raw.ids, raw.parents))
    }
}
