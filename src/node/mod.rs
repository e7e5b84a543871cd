//! node
//!
//! Adapter layer between user node types and the id graphs.
//!
//! # Architecture
//!
//! Callers usually have their own node type already: a commit that
//! knows its parent hashes, a task that knows its prerequisites. The
//! [`GraphNode`] trait asks such a type for exactly two things, its
//! id and its parent ids, and the free functions here assemble id
//! graphs and id -> node maps from any collection of implementors.
//! The graphs themselves stay id-only; nodes are never stored inside
//! them.
//!
//! A parent id that no node in the collection declares still becomes
//! a vertex, so partial collections produce closed graphs.
//!
//! # Example
//!
//! ```
//! use espalier::node::{self, IdNode};
//!
//! let nodes = vec![
//!     IdNode::root("r"),
//!     IdNode::new("a", ["r"]),
//!     IdNode::new("b", ["r"]),
//! ];
//!
//! let tree = node::id_tree(&nodes).unwrap();
//! assert_eq!(tree.root_id(), &"r");
//! assert_eq!(tree.child_ids(&"r"), &["a", "b"].into());
//! ```

use crate::graph::dag::Dag;
use crate::graph::digraph::Digraph;
use crate::graph::errors::GraphError;
use crate::graph::id::{GraphId, IdMultimap};
use crate::graph::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use thiserror::Error;

/// Errors from node collections.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NodeError<Id: Debug> {
    /// Two nodes in the collection declared the same id.
    #[error("two nodes declare the same id: {0:?}")]
    IdConflict(Id),
}

/// A value that knows its own id and the ids of its parents.
///
/// Implementors only describe edges pointing upward; the child
/// direction is derived by the graph like everywhere else in the
/// crate.
pub trait GraphNode {
    type Id: GraphId;

    /// This node's id.
    fn id(&self) -> &Self::Id;

    /// Ids of this node's parents; empty for a root.
    fn parent_ids(&self) -> Vec<Self::Id>;
}

/// Minimal [`GraphNode`] carrier: an id plus its parent ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdNode<Id> {
    id: Id,
    parent_ids: BTreeSet<Id>,
}

impl<Id: GraphId> IdNode<Id> {
    /// A node with the given parents.
    pub fn new<P>(id: Id, parent_ids: P) -> Self
    where
        P: IntoIterator<Item = Id>,
    {
        Self {
            id,
            parent_ids: parent_ids.into_iter().collect(),
        }
    }

    /// A parentless node.
    pub fn root(id: Id) -> Self {
        Self {
            id,
            parent_ids: BTreeSet::new(),
        }
    }
}

impl<Id: GraphId> GraphNode for IdNode<Id> {
    type Id = Id;

    fn id(&self) -> &Id {
        &self.id
    }

    fn parent_ids(&self) -> Vec<Id> {
        self.parent_ids.iter().cloned().collect()
    }
}

/// Every id the collection mentions: each node's own id and each of
/// its parent ids, declared or not.
pub fn id_set<N: GraphNode>(nodes: &[N]) -> BTreeSet<N::Id> {
    let mut ids = BTreeSet::new();
    for node in nodes {
        ids.insert(node.id().clone());
        ids.extend(node.parent_ids());
    }
    ids
}

/// The parent relation declared by the collection. Nodes sharing an
/// id merge their parent sets here; use [`node_map`] when duplicates
/// must be an error.
pub fn parent_map<N: GraphNode>(nodes: &[N]) -> IdMultimap<N::Id> {
    let mut map = IdMultimap::new();
    for node in nodes {
        map.entry(node.id().clone())
            .or_default()
            .extend(node.parent_ids());
    }
    map
}

/// Index the collection by id.
///
/// # Errors
///
/// [`NodeError::IdConflict`] when two nodes declare the same id.
pub fn node_map<N, I>(nodes: I) -> Result<BTreeMap<N::Id, N>, NodeError<N::Id>>
where
    N: GraphNode,
    I: IntoIterator<Item = N>,
{
    let mut map = BTreeMap::new();
    for node in nodes {
        let id = node.id().clone();
        if map.insert(id.clone(), node).is_some() {
            return Err(NodeError::IdConflict(id));
        }
    }
    Ok(map)
}

/// Assemble the general graph the collection describes.
pub fn id_graph<N: GraphNode>(nodes: &[N]) -> Digraph<N::Id> {
    Digraph::from_parent_map_with_ids(id_set(nodes), parent_map(nodes))
}

/// Assemble and validate as a DAG.
pub fn id_dag<N: GraphNode>(nodes: &[N]) -> Result<Dag<N::Id>, GraphError> {
    Dag::try_new(id_graph(nodes))
}

/// Assemble and validate as a tree.
pub fn id_tree<N: GraphNode>(nodes: &[N]) -> Result<Tree<N::Id>, GraphError> {
    Tree::try_from(id_graph(nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A caller-owned node type: commits carrying payload besides
    /// their edges.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Commit {
        hash: &'static str,
        message: &'static str,
        parents: Vec<&'static str>,
    }

    impl Commit {
        fn new(hash: &'static str, message: &'static str, parents: &[&'static str]) -> Self {
            Self {
                hash,
                message,
                parents: parents.to_vec(),
            }
        }
    }

    impl GraphNode for Commit {
        type Id = &'static str;

        fn id(&self) -> &&'static str {
            &self.hash
        }

        fn parent_ids(&self) -> Vec<&'static str> {
            self.parents.clone()
        }
    }

    fn history() -> Vec<Commit> {
        vec![
            Commit::new("c1", "init", &[]),
            Commit::new("c2", "feature", &["c1"]),
            Commit::new("c3", "fix", &["c1"]),
            Commit::new("c4", "merge", &["c2", "c3"]),
        ]
    }

    mod assembly {
        use super::*;

        #[test]
        fn id_set_covers_declared_and_referenced_ids() {
            let nodes = vec![IdNode::new("b", ["a"])];
            assert_eq!(id_set(&nodes), ["a", "b"].into());
        }

        #[test]
        fn parent_map_mirrors_the_nodes() {
            let map = parent_map(&history());
            assert_eq!(map.get("c4"), Some(&["c2", "c3"].into()));
            assert_eq!(map.get("c1"), Some(&BTreeSet::new()));
        }

        #[test]
        fn graph_reflects_the_collection() {
            let g = id_graph(&history());
            assert_eq!(g.root_ids(), &["c1"].into());
            assert_eq!(g.leaf_ids(), &["c4"].into());
            assert_eq!(g.descendant_ids(["c1"], false), ["c2", "c3", "c4"].into());
        }

        #[test]
        fn referenced_but_undeclared_parent_becomes_a_root() {
            let nodes = vec![Commit::new("c2", "orphan", &["c1"])];
            let g = id_graph(&nodes);
            assert!(g.contains_id(&"c1"));
            assert_eq!(g.root_ids(), &["c1"].into());
        }
    }

    mod indexing {
        use super::*;

        #[test]
        fn node_map_indexes_by_id() {
            let map = node_map(history()).expect("distinct ids");
            assert_eq!(map.len(), 4);
            assert_eq!(map.get("c2").map(|c| c.message), Some("feature"));
        }

        #[test]
        fn duplicate_ids_conflict() {
            let nodes = vec![
                Commit::new("c1", "first", &[]),
                Commit::new("c1", "second", &[]),
            ];
            assert_eq!(node_map(nodes).unwrap_err(), NodeError::IdConflict("c1"));
        }
    }

    mod refinements {
        use super::*;

        #[test]
        fn merge_history_is_a_dag_but_not_a_tree() {
            assert!(id_dag(&history()).is_ok());
            assert!(matches!(
                id_tree(&history()).unwrap_err(),
                GraphError::TreeInvariantViolated(_)
            ));
        }

        #[test]
        fn cyclic_nodes_are_rejected() {
            let nodes = vec![IdNode::new("a", ["b"]), IdNode::new("b", ["a"])];
            assert_eq!(id_dag(&nodes).unwrap_err(), GraphError::CycleDetected);
        }

        #[test]
        fn linear_history_is_a_tree() {
            let nodes = vec![
                IdNode::root("c1"),
                IdNode::new("c2", ["c1"]),
                IdNode::new("c3", ["c2"]),
            ];
            let tree = id_tree(&nodes).expect("tree");
            assert_eq!(tree.root_id(), &"c1");
            assert_eq!(tree.depth(&"c3"), Some(2));
        }
    }
}
