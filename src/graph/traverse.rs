//! graph::traverse
//!
//! Generic lazy traversal over an id space.
//!
//! # Architecture
//!
//! One engine serves every ordering and reachability query in the
//! crate. A traversal is parameterized by:
//!
//! - [`Order`] - depth-first (LIFO) or breadth-first (FIFO)
//! - whether the start ids themselves are yielded
//! - the start ids (one or many)
//! - an expansion function mapping an id to its next ids
//!
//! The expansion function is arbitrary: walking a graph upward, a
//! graph downward, or something that is not a stored graph at all are
//! all the same traversal. Graph types plug in their parent or child
//! lookups.
//!
//! # Invariants
//!
//! - Each id is yielded at most once, however many times expansion
//!   reaches it. Cyclic expansions therefore terminate.
//! - Ids are produced on demand; dropping the iterator early performs
//!   no further expansion calls.
//! - Depth-first yields an id before anything from its expansion, and
//!   descends into the first-listed next id first.
//!
//! # Example
//!
//! ```
//! use espalier::{Order, Traversal};
//!
//! // Expansion over an implicit binary heap layout, no graph stored.
//! let next = |id: &u32| if *id < 4 { vec![id * 2, id * 2 + 1] } else { vec![] };
//!
//! let depth: Vec<u32> = Traversal::new(Order::DepthFirst, true, [1], next).collect();
//! assert_eq!(depth, vec![1, 2, 4, 5, 3, 6, 7]);
//!
//! let breadth: Vec<u32> = Traversal::new(Order::BreadthFirst, true, [1], next).collect();
//! assert_eq!(breadth, vec![1, 2, 3, 4, 5, 6, 7]);
//! ```

use super::id::GraphId;
use std::collections::{HashSet, VecDeque};

/// Visit order for a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Stack discipline: follow one expansion chain to its end before
    /// backtracking.
    DepthFirst,
    /// Queue discipline: visit everything at one expansion distance
    /// before moving further out.
    BreadthFirst,
}

/// A lazy iterator over the ids reachable from a start set.
///
/// Construct with [`Traversal::new`]; consume through the [`Iterator`]
/// interface. The traversal owns its frontier and visited set, so it
/// can outlive borrows of whatever the expansion function reads.
pub struct Traversal<Id, F> {
    order: Order,
    frontier: VecDeque<Id>,
    visited: HashSet<Id>,
    /// Start ids withheld from the output when `include_starts` is
    /// false. They are still expanded through, and stay withheld even
    /// when a cycle leads back to them.
    suppressed: HashSet<Id>,
    expand: F,
}

impl<Id, F> Traversal<Id, F>
where
    Id: GraphId,
    F: FnMut(&Id) -> Vec<Id>,
{
    /// Set up a traversal from `starts`.
    ///
    /// With `include_starts` false the start ids are walked through
    /// but never yielded, which turns a reachability walk into a
    /// strict (exclusive) closure.
    pub fn new<I>(order: Order, include_starts: bool, starts: I, expand: F) -> Self
    where
        I: IntoIterator<Item = Id>,
    {
        let starts: Vec<Id> = starts.into_iter().collect();
        let suppressed = if include_starts {
            HashSet::new()
        } else {
            starts.iter().cloned().collect()
        };
        // The stack pops from the back; seed reversed so the
        // first-listed start is explored first either way.
        let frontier: VecDeque<Id> = match order {
            Order::DepthFirst => starts.into_iter().rev().collect(),
            Order::BreadthFirst => starts.into_iter().collect(),
        };

        Self {
            order,
            frontier,
            visited: HashSet::new(),
            suppressed,
            expand,
        }
    }
}

impl<Id, F> Iterator for Traversal<Id, F>
where
    Id: GraphId,
    F: FnMut(&Id) -> Vec<Id>,
{
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        loop {
            let current = match self.order {
                Order::DepthFirst => self.frontier.pop_back()?,
                Order::BreadthFirst => self.frontier.pop_front()?,
            };

            // An id can sit in the frontier several times before its
            // first visit; only the first pop counts.
            if !self.visited.insert(current.clone()) {
                continue;
            }

            let expansion = (self.expand)(&current);
            match self.order {
                // Reversed so the first-listed next id is popped first.
                Order::DepthFirst => {
                    for next in expansion.into_iter().rev() {
                        self.frontier.push_back(next);
                    }
                }
                Order::BreadthFirst => {
                    for next in expansion {
                        self.frontier.push_back(next);
                    }
                }
            }

            if self.suppressed.contains(&current) {
                continue;
            }
            return Some(current);
        }
    }
}
