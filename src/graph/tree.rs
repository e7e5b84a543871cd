//! graph::tree
//!
//! Rooted tree: a [`Dag`] with exactly one root and at most one
//! parent per id.
//!
//! # Architecture
//!
//! `Tree` wraps a validated DAG and adds the two tree conditions on
//! top of acyclicity. Together they force the shape: following parent
//! edges from any id is a single path that must end at the one
//! parentless id, so connectivity needs no separate check and the
//! root can be captured at construction. Queries that only make sense
//! on single-parent graphs (`parent_id`, `ancestor_path`, `depth`)
//! live here; everything else is inherited.
//!
//! # Invariants
//!
//! - Exactly one root; the empty graph is not a tree.
//! - Every non-root id has exactly one parent.
//! - `ancestor_path` of any id ends at `root_id`.
//!
//! # Example
//!
//! ```
//! use espalier::Tree;
//!
//! let tree = Tree::from_parent_pairs([("a", "r"), ("b", "r"), ("c", "a")]).unwrap();
//! assert_eq!(tree.root_id(), &"r");
//! assert_eq!(tree.ancestor_path(&"c", false), vec!["a", "r"]);
//! assert_eq!(tree.depth(&"c"), Some(2));
//! ```

use super::dag::Dag;
use super::digraph::Digraph;
use super::errors::GraphError;
use super::id::GraphId;
use super::traverse::Order;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// An immutable rooted tree over bare ids.
#[derive(Clone)]
pub struct Tree<Id> {
    dag: Dag<Id>,
    /// The unique parentless id, captured at validation.
    root: Id,
}

impl<Id: GraphId> Tree<Id> {
    /// Validate `dag` as tree-shaped.
    ///
    /// # Errors
    ///
    /// [`GraphError::TreeInvariantViolated`] when the graph has no
    /// ids, more than one root, or an id with several parents.
    pub fn try_new(dag: Dag<Id>) -> Result<Self, GraphError> {
        let mut roots = dag.root_ids().iter();
        let root = match (roots.next(), roots.next()) {
            (Some(root), None) => root.clone(),
            _ => {
                return Err(GraphError::TreeInvariantViolated(format!(
                    "expected exactly one root, found {}",
                    dag.root_ids().len()
                )))
            }
        };

        for (id, parent_ids) in dag.parent_map() {
            if parent_ids.len() > 1 {
                return Err(GraphError::TreeInvariantViolated(format!(
                    "id {:?} has {} parents, expected one",
                    id,
                    parent_ids.len()
                )));
            }
        }

        Ok(Self { dag, root })
    }

    /// The DAG view of this tree.
    pub fn as_dag(&self) -> &Dag<Id> {
        &self.dag
    }

    /// Unwrap into the underlying DAG.
    pub fn into_dag(self) -> Dag<Id> {
        self.dag
    }

    /// The unique id without a parent.
    pub fn root_id(&self) -> &Id {
        &self.root
    }

    /// The parent of `id`; `None` for the root and for unknown ids.
    pub fn parent_id(&self, id: &Id) -> Option<&Id> {
        self.dag.parent_ids(id).iter().next()
    }

    /// Ancestors of `id` as a path, nearest parent first, root last.
    /// With `inclusive` the id itself leads the path.
    pub fn ancestor_path(&self, id: &Id, inclusive: bool) -> Vec<Id> {
        self.dag.walk(
            Order::DepthFirst,
            inclusive,
            [id.clone()],
            self.dag.parent_expand(),
        )
    }

    /// Edge distance from the root; 0 for the root itself, `None` for
    /// unknown ids.
    pub fn depth(&self, id: &Id) -> Option<usize> {
        if !self.dag.contains_id(id) {
            return None;
        }
        Some(self.ancestor_path(id, false).len())
    }
}

impl<Id: GraphId> Deref for Tree<Id> {
    type Target = Dag<Id>;

    fn deref(&self) -> &Dag<Id> {
        &self.dag
    }
}

impl<Id: GraphId> TryFrom<Dag<Id>> for Tree<Id> {
    type Error = GraphError;

    fn try_from(dag: Dag<Id>) -> Result<Self, GraphError> {
        Tree::try_new(dag)
    }
}

impl<Id: GraphId> TryFrom<Digraph<Id>> for Tree<Id> {
    type Error = GraphError;

    /// Validates acyclicity first, then tree shape.
    fn try_from(graph: Digraph<Id>) -> Result<Self, GraphError> {
        Tree::try_new(Dag::try_new(graph)?)
    }
}

impl<Id: GraphId> From<Tree<Id>> for Dag<Id> {
    fn from(tree: Tree<Id>) -> Self {
        tree.into_dag()
    }
}

impl<Id: GraphId> From<Tree<Id>> for Digraph<Id> {
    fn from(tree: Tree<Id>) -> Self {
        tree.into_dag().into_digraph()
    }
}

impl<Id: GraphId> PartialEq for Tree<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.dag == other.dag
    }
}

impl<Id: GraphId> Eq for Tree<Id> {}

impl<Id: GraphId> fmt::Debug for Tree<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("parents", self.dag.parent_map())
            .finish()
    }
}

impl<Id> Serialize for Tree<Id>
where
    Id: GraphId + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.dag.serialize(serializer)
    }
}

impl<'de, Id> Deserialize<'de> for Tree<Id>
where
    Id: GraphId + Deserialize<'de>,
{
    /// Deserializes and re-validates; non-tree payloads are rejected.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dag = Dag::deserialize(deserializer)?;
        Tree::try_new(dag).map_err(serde::de::Error::custom)
    }
}
