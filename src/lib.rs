//! An ordered set built on a red-black tree, and an interval tree built on
//! the same machinery.
//!
//! [`RbTree`] is the generic balanced tree: values are kept in the order of a
//! [`Comparator`], and every node caches a per-subtree [`Augment`] value that
//! the tree keeps consistent through rotations and deletions. [`RbSet`] is the
//! plain instantiation; [`IntervalTree`] stores [`Event`]s with the bounding
//! [`Interval`] of each subtree, so overlap and stabbing queries skip subtrees
//! that cannot match.
//!
//! ```
//! use interval_rbset::{Event, Interval, IntervalTree};
//!
//! let mut t = IntervalTree::new();
//! t.insert(Event::try_new(1, 3, 'A').unwrap());
//! t.insert(Event::try_new(2, 10, 'B').unwrap());
//! t.insert(Event::try_new(100, 101, 'D').unwrap());
//!
//! let q = Interval::new(0, 5).unwrap();
//! let hits: String = t.overlaps(&q).map(|e| *e.payload()).collect();
//! assert_eq!(hits, "AB");
//! ```

mod augment;
mod error;
mod interval;
mod interval_tree;
mod iter;
mod node;
mod order;
mod redblack;
mod set;
mod tree;

#[cfg(test)]
mod test_utils;

pub use augment::{Augment, NoAugment, SubtreeCount};
pub use error::{Error, Result};
pub use interval::Interval;
pub use interval_tree::{Event, HasInterval, IntervalTree, Overlaps, Stabbing, SubtreeBounds};
pub use iter::{CursorMut, Iter, Nodes, Range};
pub use node::{Color, NodeId, NodeRef};
pub use order::{Comparator, NaturalOrder, Reversed};
pub use set::RbSet;
pub use tree::RbTree;
