//! graph::dag
//!
//! Directed acyclic graph: a [`Digraph`] validated at construction.
//!
//! # Architecture
//!
//! `Dag` wraps a general graph and proves acyclicity once, in
//! [`Dag::try_new`]. The topological order found during validation is
//! kept on the value, so [`Dag::topsort_ids`] is total where the
//! general graph's is optional. All general queries remain available
//! through deref or [`Dag::as_digraph`].
//!
//! Full depth-first and breadth-first orders over the whole graph are
//! materialized on first request and cached; immutability makes the
//! caches write-once.
//!
//! # Invariants
//!
//! - The wrapped graph is acyclic; every edge places its parent
//!   strictly before its child in `topsort_ids`.
//! - Closure subgraphs of a DAG are DAGs, so
//!   [`ancestor_graph`](Dag::ancestor_graph) and
//!   [`descendant_graph`](Dag::descendant_graph) return `Dag` with no
//!   error path.
//! - Equal graph values report equal topological orders regardless of
//!   how they were constructed.
//!
//! # Example
//!
//! ```
//! use espalier::{Dag, GraphError};
//!
//! let dag = Dag::from_parent_pairs([("b", "a"), ("c", "b")]).unwrap();
//! assert_eq!(dag.topsort_ids().to_vec(), vec!["a", "b", "c"]);
//!
//! let cyclic = Dag::from_parent_pairs([("a", "b"), ("b", "a")]);
//! assert_eq!(cyclic.unwrap_err(), GraphError::CycleDetected);
//! ```

use super::digraph::Digraph;
use super::errors::GraphError;
use super::id::GraphId;
use super::traverse::Order;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

/// An immutable directed graph known to be acyclic.
#[derive(Clone)]
pub struct Dag<Id> {
    graph: Digraph<Id>,
    /// Kahn order captured at validation.
    topo: Vec<Id>,
    /// Depth-first order over the whole graph, roots down.
    depth: OnceLock<Vec<Id>>,
    /// Breadth-first order over the whole graph, roots down.
    breadth: OnceLock<Vec<Id>>,
}

impl<Id: GraphId> Dag<Id> {
    /// Validate `graph` as acyclic.
    ///
    /// # Errors
    ///
    /// [`GraphError::CycleDetected`] when the parent relation has a
    /// cycle (self-loops included).
    pub fn try_new(graph: Digraph<Id>) -> Result<Self, GraphError> {
        let topo = match graph.topsort_ids() {
            Some(order) => order.to_vec(),
            None => return Err(GraphError::CycleDetected),
        };
        Ok(Self {
            graph,
            topo,
            depth: OnceLock::new(),
            breadth: OnceLock::new(),
        })
    }

    /// Wrap a graph that cannot be cyclic by construction.
    ///
    /// Used for closure subgraphs: removing ids and edges from an
    /// acyclic graph cannot introduce a cycle, so the order always
    /// materializes. The order is recomputed on the subgraph rather
    /// than inherited, keeping it canonical for the subgraph value.
    /// Handing this a cyclic graph is a bug in the caller, and panics
    /// rather than producing a `Dag` whose order is missing ids.
    fn from_acyclic(graph: Digraph<Id>) -> Self {
        let topo = graph
            .topsort_ids()
            .expect("subgraph of an acyclic graph is acyclic")
            .to_vec();
        Self {
            graph,
            topo,
            depth: OnceLock::new(),
            breadth: OnceLock::new(),
        }
    }

    /// The general-graph view of this DAG.
    pub fn as_digraph(&self) -> &Digraph<Id> {
        &self.graph
    }

    /// Unwrap into the general graph.
    pub fn into_digraph(self) -> Digraph<Id> {
        self.graph
    }

    /// Topological order of all ids, parents strictly before
    /// children, ascending among ties. Total: acyclicity was proven
    /// at construction.
    pub fn topsort_ids(&self) -> &[Id] {
        &self.topo
    }

    /// The sub-DAG induced by the ancestor closure of `starts`.
    pub fn ancestor_graph<I>(&self, starts: I, inclusive: bool) -> Dag<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        Dag::from_acyclic(self.graph.ancestor_graph(starts, inclusive))
    }

    /// The sub-DAG induced by the descendant closure of `starts`.
    pub fn descendant_graph<I>(&self, starts: I, inclusive: bool) -> Dag<Id>
    where
        I: IntoIterator<Item = Id>,
    {
        Dag::from_acyclic(self.graph.descendant_graph(starts, inclusive))
    }

    /// Depth-first order over the whole graph: seeded from every root
    /// in ascending order, descending along child edges. Computed once
    /// and cached.
    pub fn depth_ids(&self) -> &[Id] {
        self.depth.get_or_init(|| {
            self.graph.walk(
                Order::DepthFirst,
                true,
                self.graph.root_ids().iter().cloned(),
                self.graph.child_expand(),
            )
        })
    }

    /// Breadth-first order over the whole graph, shallow ids first.
    /// Computed once and cached.
    pub fn breadth_ids(&self) -> &[Id] {
        self.breadth.get_or_init(|| {
            self.graph.walk(
                Order::BreadthFirst,
                true,
                self.graph.root_ids().iter().cloned(),
                self.graph.child_expand(),
            )
        })
    }
}

impl<Id: GraphId> Deref for Dag<Id> {
    type Target = Digraph<Id>;

    fn deref(&self) -> &Digraph<Id> {
        &self.graph
    }
}

impl<Id: GraphId> TryFrom<Digraph<Id>> for Dag<Id> {
    type Error = GraphError;

    fn try_from(graph: Digraph<Id>) -> Result<Self, GraphError> {
        Dag::try_new(graph)
    }
}

impl<Id: GraphId> From<Dag<Id>> for Digraph<Id> {
    fn from(dag: Dag<Id>) -> Self {
        dag.into_digraph()
    }
}

impl<Id: GraphId> PartialEq for Dag<Id> {
    fn eq(&self, other: &Self) -> bool {
        self.graph == other.graph
    }
}

impl<Id: GraphId> Eq for Dag<Id> {}

impl<Id: GraphId> fmt::Debug for Dag<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dag")
            .field("ids", self.graph.ids())
            .field("parents", self.graph.parent_map())
            .finish()
    }
}

impl<Id> Serialize for Dag<Id>
where
    Id: GraphId + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.graph.serialize(serializer)
    }
}

impl<'de, Id> Deserialize<'de> for Dag<Id>
where
    Id: GraphId + Deserialize<'de>,
{
    /// Deserializes the general-graph form, then re-validates, so a
    /// cyclic payload cannot produce a `Dag`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let graph = Digraph::deserialize(deserializer)?;
        Dag::try_new(graph).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two separate trees: a -> {b, c} and d -> {e}, parents up.
    fn two_trees() -> Dag<&'static str> {
        Dag::from_parent_map([("b", vec!["a"]), ("c", vec!["a"]), ("e", vec!["d"])])
            .expect("acyclic")
    }

    mod construction {
        use super::*;

        #[test]
        fn accepts_acyclic_graph() {
            let dag = two_trees();
            assert_eq!(dag.id_count(), 5);
        }

        #[test]
        fn rejects_cycle() {
            let err = Dag::from_parent_pairs([("a", "b"), ("b", "c"), ("c", "a")]).unwrap_err();
            assert_eq!(err, GraphError::CycleDetected);
        }

        #[test]
        fn rejects_self_loop() {
            let err = Dag::from_parent_pairs([("a", "a")]).unwrap_err();
            assert_eq!(err, GraphError::CycleDetected);
        }

        #[test]
        fn empty_graph_is_a_dag() {
            let dag = Dag::from_parent_map(Vec::<(u32, Vec<u32>)>::new()).expect("acyclic");
            assert!(dag.topsort_ids().is_empty());
            assert!(dag.depth_ids().is_empty());
        }

        #[test]
        fn try_from_digraph() {
            let g = Digraph::from_parent_pairs([("b", "a")]);
            assert!(Dag::try_from(g).is_ok());

            let cyclic = Digraph::from_parent_pairs([("a", "b"), ("b", "a")]);
            assert_eq!(Dag::try_from(cyclic).unwrap_err(), GraphError::CycleDetected);
        }
    }

    mod topsort {
        use super::*;

        #[test]
        fn total_and_parents_first() {
            let dag = two_trees();
            let order = dag.topsort_ids();
            let position = |id: &&str| order.iter().position(|x| x == id).expect("placed");
            for (id, parent_ids) in dag.parent_map() {
                for parent_id in parent_ids {
                    assert!(position(parent_id) < position(id));
                }
            }
        }

        #[test]
        fn matches_the_general_graph_order() {
            let g = Digraph::from_parent_pairs([("b", "a"), ("c", "b")]);
            let expected = g.topsort_ids().map(|order| order.to_vec());
            let dag = Dag::try_new(g).expect("acyclic");
            assert_eq!(expected, Some(dag.topsort_ids().to_vec()));
        }
    }

    mod closure_graphs {
        use super::*;

        #[test]
        fn ancestor_graph_is_a_dag_with_filtered_edges() {
            let dag = Dag::from_parent_pairs([("c", "b"), ("b", "a")]).expect("acyclic");
            let sub = dag.ancestor_graph(["c"], false);
            assert_eq!(sub.ids(), &["a", "b"].into());
            assert_eq!(sub.topsort_ids().to_vec(), vec!["a", "b"]);
        }

        #[test]
        fn descendant_graph_keeps_internal_edges_only() {
            let dag = two_trees();
            let sub = dag.descendant_graph(["a"], false);
            assert_eq!(sub.ids(), &["b", "c"].into());
            assert!(sub.parent_map().is_empty());
        }

        #[test]
        fn closure_graph_topsort_is_canonical() {
            // "a" waits on "z" in the full graph; inside the closure
            // that constraint is gone.
            let dag = Dag::from_parent_map([("a", vec!["s", "z"]), ("b", vec!["s"])])
                .expect("acyclic");
            assert_eq!(dag.topsort_ids().to_vec(), vec!["s", "b", "z", "a"]);

            let sub = dag.descendant_graph(["s"], true);
            let fresh = Dag::from_parent_map([("a", vec!["s"]), ("b", vec!["s"])])
                .expect("acyclic");
            assert_eq!(sub, fresh);
            assert_eq!(sub.topsort_ids(), fresh.topsort_ids());
            assert_eq!(sub.topsort_ids().to_vec(), vec!["s", "a", "b"]);
        }
    }

    mod orders {
        use super::*;

        #[test]
        fn depth_ids_walk_each_root_to_exhaustion() {
            let dag = two_trees();
            assert_eq!(dag.depth_ids().to_vec(), vec!["a", "b", "c", "d", "e"]);
        }

        #[test]
        fn breadth_ids_walk_level_by_level() {
            let dag = two_trees();
            assert_eq!(dag.breadth_ids().to_vec(), vec!["a", "d", "b", "c", "e"]);
        }

        #[test]
        fn orders_are_computed_once() {
            let dag = two_trees();
            let first = dag.depth_ids();
            let second = dag.depth_ids();
            assert!(std::ptr::eq(first, second));
        }
    }

    mod delegation {
        use super::*;

        #[test]
        fn deref_exposes_general_queries() {
            let dag = two_trees();
            assert_eq!(dag.root_ids(), &["a", "d"].into());
            assert!(dag.is_ancestor_of(&"a", &"c", false));
            assert!(!dag.contains_cycle());
        }

        #[test]
        fn conversions_between_layers() {
            let g = Digraph::from_parent_pairs([("b", "a")]);
            let dag = Dag::try_from(g.clone()).expect("acyclic");
            let back: Digraph<&str> = dag.into();
            assert_eq!(back, g);
        }
    }

    mod serde_validation {
        use super::*;

        #[test]
        fn round_trip_preserves_graph_and_order() {
            let dag = Dag::from_parent_map([
                ("b".to_string(), vec!["a".to_string()]),
                ("c".to_string(), vec!["b".to_string()]),
            ])
            .expect("acyclic");

            let json = serde_json::to_string(&dag).expect("serialize");
            let back: Dag<String> = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, dag);
            assert_eq!(back.topsort_ids(), dag.topsort_ids());
        }

        #[test]
        fn cyclic_payload_fails_to_deserialize() {
            let json = r#"{"ids":[],"parents":{"a":["b"],"b":["a"]}}"#;
            let result: Result<Dag<String>, _> = serde_json::from_str(json);
            assert!(result.is_err());
        }
    }
}
