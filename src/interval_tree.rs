//! An [`RbTree`] of intervals augmented with the bounding interval of every
//! subtree, answering overlap and stabbing queries without visiting subtrees
//! that cannot match.

use std::{
    cmp::Ordering,
    fmt::{self, Display},
    iter::Rev,
    ops::Bound,
};

use log::trace;

use crate::{
    augment::Augment,
    error::Result,
    interval::Interval,
    iter::{CursorMut, Iter, Nodes, Range},
    node::{Node, NodeId, NodeRef},
    order::NaturalOrder,
    tree::RbTree,
};

/// A value carrying an interval.
pub trait HasInterval {
    type Scalar: Ord + Clone;

    fn interval(&self) -> &Interval<Self::Scalar>;
}

impl<T: Ord + Clone> HasInterval for Interval<T> {
    type Scalar = T;

    fn interval(&self) -> &Interval<T> {
        self
    }
}

/// Caches the smallest interval covering every interval in a subtree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubtreeBounds;

impl<V: HasInterval> Augment<V> for SubtreeBounds {
    type Value = Interval<V::Scalar>;

    fn compute(
        value: &V,
        left: Option<&Self::Value>,
        right: Option<&Self::Value>,
    ) -> Self::Value {
        [left, right]
            .into_iter()
            .flatten()
            .fold(value.interval().clone(), |acc, b| acc.hull(b))
    }
}

/// An interval paired with a payload.
///
/// Events order by `from`, then `to`, then payload; the inclusivity flags
/// break any remaining tie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event<T, P> {
    interval: Interval<T>,
    payload: P,
}

impl<T: Ord, P> Event<T, P> {
    pub fn new(interval: Interval<T>, payload: P) -> Self {
        Self { interval, payload }
    }

    /// An event over the half-open interval `[from, to)`.
    pub fn try_new(from: T, to: T, payload: P) -> Result<Self> {
        Ok(Self::new(Interval::new(from, to)?, payload))
    }

    pub fn interval(&self) -> &Interval<T> {
        &self.interval
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_parts(self) -> (Interval<T>, P) {
        (self.interval, self.payload)
    }
}

impl<T: Ord + Clone, P> HasInterval for Event<T, P> {
    type Scalar = T;

    fn interval(&self) -> &Interval<T> {
        &self.interval
    }
}

impl<T: Ord, P: Ord> PartialOrd for Event<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord, P: Ord> Ord for Event<T, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.interval
            .from()
            .cmp(other.interval.from())
            .then_with(|| self.interval.to().cmp(other.interval.to()))
            .then_with(|| self.payload.cmp(&other.payload))
            .then_with(|| self.interval.cmp(&other.interval))
    }
}

impl<T: Display, P: Display> Display for Event<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.interval, self.payload)
    }
}

/// Decides which subtrees and nodes a [`PruningIter`] visits.
trait PruningOracle<T> {
    /// Returns true when the subtree whose intervals are all covered by
    /// `bound` may hold a match.
    fn visit_subtree(&self, bound: &Interval<T>) -> bool;

    /// Returns true if `interval` matches and should be yielded.
    fn filter_yield(&self, interval: &Interval<T>) -> bool;
}

struct OverlapsOracle<'q, T>(&'q Interval<T>);

impl<T: Ord> PruningOracle<T> for OverlapsOracle<'_, T> {
    fn visit_subtree(&self, bound: &Interval<T>) -> bool {
        bound.overlaps(self.0)
    }

    fn filter_yield(&self, interval: &Interval<T>) -> bool {
        interval.overlaps(self.0)
    }
}

struct StabbingOracle<'q, T>(&'q T);

impl<T: Ord> PruningOracle<T> for StabbingOracle<'_, T> {
    fn visit_subtree(&self, bound: &Interval<T>) -> bool {
        bound.is_within(self.0)
    }

    fn filter_yield(&self, interval: &Interval<T>) -> bool {
        interval.is_within(self.0)
    }
}

/// A depth-first, in-order walk that skips every subtree whose bounding
/// interval the oracle rejects.
struct PruningIter<'a, T, P, O> {
    nodes: &'a [Node<Event<T, P>, Interval<T>>],
    stack: Vec<NodeId>,
    oracle: O,
}

impl<'a, T, P, O> PruningIter<'a, T, P, O>
where
    O: PruningOracle<T>,
{
    fn new(nodes: &'a [Node<Event<T, P>, Interval<T>>], root: Option<NodeId>, oracle: O) -> Self {
        let mut this = Self {
            nodes,
            stack: vec![],
            oracle,
        };
        if let Some(root) = root {
            this.push_subtree(root);
        }
        this
    }

    /// Descend the left spine of `subtree_root`, stopping at the first
    /// subtree that cannot hold a match.
    fn push_subtree(&mut self, subtree_root: NodeId) {
        let mut ptr = Some(subtree_root);
        while let Some(id) = ptr {
            let node = &self.nodes[id.index()];
            if !self.oracle.visit_subtree(&node.aug) {
                break;
            }
            self.stack.push(id);
            ptr = node.left;
        }
    }
}

impl<'a, T, P, O> Iterator for PruningIter<'a, T, P, O>
where
    O: PruningOracle<T>,
{
    type Item = &'a Event<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            let node = &self.nodes[id.index()];

            if let Some(right) = node.right {
                self.push_subtree(right);
            }

            if self.oracle.filter_yield(&node.value.interval) {
                return Some(&node.value);
            }
        }
    }
}

/// Events overlapping a query interval, in tree order. Created by
/// [`IntervalTree::overlaps`].
pub struct Overlaps<'a, 'q, T, P> {
    inner: PruningIter<'a, T, P, OverlapsOracle<'q, T>>,
}

impl<'a, T: Ord, P> Iterator for Overlaps<'a, '_, T, P> {
    type Item = &'a Event<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Events containing a query point, in tree order. Created by
/// [`IntervalTree::stabbing`].
pub struct Stabbing<'a, 'q, T, P> {
    inner: PruningIter<'a, T, P, StabbingOracle<'q, T>>,
}

impl<'a, T: Ord, P> Iterator for Stabbing<'a, '_, T, P> {
    type Item = &'a Event<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An ordered set of [`Event`]s indexed for interval queries.
///
/// ```
/// use interval_rbset::{Event, Interval, IntervalTree};
///
/// let mut t = IntervalTree::new();
/// t.insert(Event::try_new(1, 3, "A").unwrap());
/// t.insert(Event::try_new(2, 10, "B").unwrap());
///
/// let hits: Vec<_> = t.containing(&2).iter().map(|e| *e.payload()).collect();
/// assert_eq!(hits, ["A", "B"]);
/// assert_eq!(t.bounds(), Some(&Interval::new(1, 10).unwrap()));
/// ```
pub struct IntervalTree<T, P>
where
    T: Ord + Clone,
{
    tree: RbTree<Event<T, P>, SubtreeBounds>,
}

impl<T, P> Default for IntervalTree<T, P>
where
    T: Ord + Clone,
    P: Ord,
{
    fn default() -> Self {
        Self {
            tree: RbTree::new(),
        }
    }
}

impl<T, P> Clone for IntervalTree<T, P>
where
    T: Ord + Clone,
    P: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<T, P> fmt::Debug for IntervalTree<T, P>
where
    T: Ord + Clone + fmt::Debug,
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.tree, f)
    }
}

impl<T, P> IntervalTree<T, P>
where
    T: Ord + Clone,
    P: Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `event`, returning false if an equal event was already present.
    pub fn insert(&mut self, event: Event<T, P>) -> bool {
        self.tree.insert(event).0
    }

    pub fn insert_interval(&mut self, interval: Interval<T>, payload: P) -> bool {
        self.insert(Event::new(interval, payload))
    }

    pub fn delete(&mut self, event: &Event<T, P>) -> bool {
        self.tree.delete(event)
    }

    pub fn take(&mut self, event: &Event<T, P>) -> Option<Event<T, P>> {
        self.tree.take(event)
    }

    pub fn contains(&self, event: &Event<T, P>) -> bool {
        self.tree.contains(event)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Lazily yields the events overlapping `query`, in tree order.
    pub fn overlaps<'a, 'q>(&'a self, query: &'q Interval<T>) -> Overlaps<'a, 'q, T, P> {
        trace!("overlap query over {} events", self.len());
        Overlaps {
            inner: PruningIter::new(&self.tree.nodes, self.tree.root, OverlapsOracle(query)),
        }
    }

    /// Lazily yields the events whose interval contains `point`, in tree
    /// order.
    pub fn stabbing<'a, 'q>(&'a self, point: &'q T) -> Stabbing<'a, 'q, T, P> {
        trace!("stabbing query over {} events", self.len());
        Stabbing {
            inner: PruningIter::new(&self.tree.nodes, self.tree.root, StabbingOracle(point)),
        }
    }

    /// Every event overlapping `query`, in tree order.
    pub fn overlapping<'a>(&'a self, query: &Interval<T>) -> Vec<&'a Event<T, P>> {
        self.overlaps(query).collect()
    }

    /// Every event whose interval contains `point`, in tree order.
    pub fn containing<'a>(&'a self, point: &T) -> Vec<&'a Event<T, P>> {
        self.stabbing(point).collect()
    }

    pub fn get(&self, event: &Event<T, P>) -> Option<&Event<T, P>> {
        self.tree.get(event)
    }

    pub fn find(&self, event: &Event<T, P>) -> Option<NodeRef<'_, Event<T, P>, Interval<T>>> {
        self.tree.find(event)
    }

    pub fn first(&self) -> Option<&Event<T, P>> {
        self.tree.first()
    }

    pub fn last(&self) -> Option<&Event<T, P>> {
        self.tree.last()
    }

    /// The greatest event less than or equal to `event`.
    pub fn floor(&self, event: &Event<T, P>) -> Option<&Event<T, P>> {
        self.tree.floor(event)
    }

    /// The least event greater than or equal to `event`.
    pub fn ceiling(&self, event: &Event<T, P>) -> Option<&Event<T, P>> {
        self.tree.ceiling(event)
    }

    /// The greatest event strictly less than `event`.
    pub fn lower(&self, event: &Event<T, P>) -> Option<&Event<T, P>> {
        self.tree.lower(event)
    }

    /// The least event strictly greater than `event`.
    pub fn higher(&self, event: &Event<T, P>) -> Option<&Event<T, P>> {
        self.tree.higher(event)
    }

    pub fn pop_first(&mut self) -> Option<Event<T, P>> {
        self.tree.pop_first()
    }

    pub fn pop_last(&mut self) -> Option<Event<T, P>> {
        self.tree.pop_last()
    }

    /// Iterates in tree order over the events between `lower` and `upper`.
    pub fn range(
        &self,
        lower: Bound<&Event<T, P>>,
        upper: Bound<&Event<T, P>>,
    ) -> Range<'_, Event<T, P>, Interval<T>> {
        self.tree.range(lower, upper)
    }

    /// A cursor positioned before the first event; removals through it keep
    /// the subtree bounds current.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, Event<T, P>, SubtreeBounds, NaturalOrder> {
        self.tree.cursor_mut()
    }

    /// Removes every event for which `keep` returns false.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Event<T, P>) -> bool,
    {
        self.tree.retain(keep);
    }
}

impl<T, P> IntervalTree<T, P>
where
    T: Ord + Clone,
{
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Event<T, P>, Interval<T>> {
        self.tree.iter()
    }

    pub fn descending(&self) -> Rev<Iter<'_, Event<T, P>, Interval<T>>> {
        self.tree.descending()
    }

    /// Iterates over the nodes in tree order, exposing the cached subtree
    /// bounds.
    pub fn nodes(&self) -> Nodes<'_, Event<T, P>, Interval<T>> {
        self.tree.nodes()
    }

    /// The smallest interval covering every stored event.
    pub fn bounds(&self) -> Option<&Interval<T>> {
        self.tree.root().map(|r| r.augment())
    }

    /// The underlying tree, for structural inspection.
    pub fn tree(&self) -> &RbTree<Event<T, P>, SubtreeBounds> {
        &self.tree
    }
}

impl<T, P> FromIterator<Event<T, P>> for IntervalTree<T, P>
where
    T: Ord + Clone,
    P: Ord,
{
    fn from_iter<I: IntoIterator<Item = Event<T, P>>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<T, P> Extend<Event<T, P>> for IntervalTree<T, P>
where
    T: Ord + Clone,
    P: Ord,
{
    fn extend<I: IntoIterator<Item = Event<T, P>>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}
