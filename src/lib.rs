//! Espalier - immutable, id-keyed directed graphs with validated refinements
//!
//! Espalier models "what depends on what" relations as immutable
//! graphs over bare id values: commit hashes, task names, module
//! paths, anything ordered and hashable. Construction takes whatever
//! shape the caller has (parent maps, child maps, edge pairs, node
//! objects), normalizes it, and validates it into the strongest type
//! that holds; after that every query is a total function.
//!
//! # Architecture
//!
//! The crate is layered:
//!
//! - [`graph`] - The graph types: [`Digraph`] (cycles allowed),
//!   [`Dag`] (validated acyclic), [`Tree`] (validated single-parent),
//!   plus the generic [`Traversal`] engine they are all built on
//! - [`node`] - Adapter layer assembling graphs from caller types
//!   that know their own id and parent ids
//!
//! # Correctness Invariants
//!
//! 1. The parent map is the only ground truth; the child map and all
//!    other derived state are computed from it, never stored
//!    independently
//! 2. Refined types validate at construction; a value's existence
//!    proves its invariants, so no query on it can fail
//! 3. Unknown ids yield empty results, never errors
//! 4. Traversal visits each id at most once and therefore terminates
//!    on cyclic inputs
//!
//! # Example
//!
//! ```
//! use espalier::{Dag, Digraph};
//!
//! // Arrows point child -> parent: a build dependency relation.
//! let deps = Dag::from_parent_pairs([
//!     ("app", "lib"),
//!     ("lib", "std"),
//!     ("tests", "lib"),
//! ])
//! .unwrap();
//!
//! // Parents always precede children.
//! assert_eq!(deps.topsort_ids().to_vec(), vec!["std", "lib", "app", "tests"]);
//!
//! // Everything "app" transitively needs.
//! assert_eq!(deps.ancestor_ids(["app"], false), ["lib", "std"].into());
//!
//! // Cyclic relations are still representable, just not as a Dag.
//! let tangle = Digraph::from_parent_pairs([("a", "b"), ("b", "a")]);
//! assert!(tangle.contains_cycle());
//! assert!(Dag::try_new(tangle).is_err());
//! ```

pub mod graph;
pub mod node;

pub use graph::build::GraphBuilder;
pub use graph::dag::Dag;
pub use graph::digraph::Digraph;
pub use graph::errors::GraphError;
pub use graph::id::{GraphId, IdMultimap};
pub use graph::traverse::{Order, Traversal};
pub use graph::tree::Tree;
pub use node::{GraphNode, IdNode, NodeError};
