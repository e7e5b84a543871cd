//! graph
//!
//! Immutable id-keyed graph types and their traversal engine.
//!
//! # Modules
//!
//! - [`id`] - Identifier bounds and the multimap alias
//! - [`digraph`] - General directed graph; cycles allowed
//! - [`dag`] - Acyclic refinement with a total topological order
//! - [`tree`] - Single-root, single-parent refinement
//! - [`traverse`] - Generic lazy depth/breadth traversal
//! - [`build`] - Factory constructors and the incremental builder
//! - [`errors`] - Construction-time error types
//!
//! # Design Principles
//!
//! - The parent map is the only ground truth; the child map, roots,
//!   leaves, and orders are all derived from it
//! - Validation happens once, at construction; queries are total
//! - Derived results are cached write-once, which immutability makes
//!   sound
//! - Every derived order is deterministic for equal graph values

pub mod build;
pub mod dag;
pub mod digraph;
pub mod errors;
pub mod id;
pub mod traverse;
pub mod tree;

pub use build::{invert, GraphBuilder};
pub use dag::Dag;
pub use digraph::Digraph;
pub use errors::GraphError;
pub use id::{GraphId, IdMultimap};
pub use traverse::{Order, Traversal};
pub use tree::Tree;
