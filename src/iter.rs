use std::{
    cmp::Ordering,
    iter::{FusedIterator, Rev},
    ops::Bound,
};

use crate::{
    augment::Augment,
    error::{Error, Result},
    node::{Node, NodeId, NodeRef},
    order::Comparator,
    tree::{predecessor, successor, RbTree},
};

/// A double-ended walk over the nodes between `front` and `back` inclusive.
struct Walk<'a, T, V> {
    nodes: &'a [Node<T, V>],
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a, T, V> Walk<'a, T, V> {
    fn next_id(&mut self) -> Option<NodeId> {
        let id = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = successor(self.nodes, id);
        }
        Some(id)
    }

    fn next_back_id(&mut self) -> Option<NodeId> {
        let id = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = predecessor(self.nodes, id);
        }
        Some(id)
    }
}

/// In-order iterator over the values of an [`RbTree`].
///
/// Created by [`RbTree::iter`]; iterate it backwards with `.rev()`.
pub struct Iter<'a, T, V> {
    walk: Walk<'a, T, V>,
    remaining: usize,
}

impl<'a, T, V> Iterator for Iter<'a, T, V> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_id()?;
        self.remaining -= 1;
        Some(&self.walk.nodes[id.index()].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, V> DoubleEndedIterator for Iter<'_, T, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        self.remaining -= 1;
        Some(&self.walk.nodes[id.index()].value)
    }
}

impl<T, V> ExactSizeIterator for Iter<'_, T, V> {}
impl<T, V> FusedIterator for Iter<'_, T, V> {}

/// In-order iterator over the values of an [`RbTree`] within a pair of
/// bounds, created by [`RbTree::range`].
pub struct Range<'a, T, V> {
    walk: Walk<'a, T, V>,
}

impl<'a, T, V> Iterator for Range<'a, T, V> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_id()?;
        Some(&self.walk.nodes[id.index()].value)
    }
}

impl<T, V> DoubleEndedIterator for Range<'_, T, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        Some(&self.walk.nodes[id.index()].value)
    }
}

impl<T, V> FusedIterator for Range<'_, T, V> {}

/// In-order iterator over the nodes of an [`RbTree`], created by
/// [`RbTree::nodes`].
pub struct Nodes<'a, T, V> {
    walk: Walk<'a, T, V>,
}

impl<'a, T, V> Iterator for Nodes<'a, T, V> {
    type Item = NodeRef<'a, T, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_id()?;
        Some(NodeRef::new(self.walk.nodes, id))
    }
}

impl<T, V> DoubleEndedIterator for Nodes<'_, T, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        Some(NodeRef::new(self.walk.nodes, id))
    }
}

/// An ascending cursor that can remove the value it last returned.
///
/// After a removal the cursor continues with the value that followed the
/// removed one.
pub struct CursorMut<'a, T, A, C>
where
    A: Augment<T>,
{
    tree: &'a mut RbTree<T, A, C>,
    /// The node last returned, or `None` before the first value.
    position: Option<NodeId>,
    /// Whether `position` holds a value that may be removed.
    current: bool,
}

impl<T, A, C> CursorMut<'_, T, A, C>
where
    A: Augment<T>,
    C: Comparator<T>,
{
    /// Advances to and returns the next value in ascending order.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        let next = match self.position {
            None => self.tree.first_id(),
            Some(id) => successor(&self.tree.nodes, id),
        };
        match next {
            Some(id) => {
                self.position = Some(id);
                self.current = true;
                Some(self.tree.value(id))
            }
            None => {
                self.current = false;
                None
            }
        }
    }

    /// Removes and returns the value last returned by [`Self::next`].
    ///
    /// Fails with [`Error::NoCurrentElement`] before the first call to
    /// `next`, after `next` ran off the end, or when called twice in a row.
    pub fn remove(&mut self) -> Result<T> {
        let id = match (self.current, self.position) {
            (true, Some(id)) => id,
            _ => return Err(Error::NoCurrentElement),
        };

        let prev = predecessor(&self.tree.nodes, id);
        let released = self.tree.delete_node(id);
        self.position = match (prev, released.moved) {
            (Some(p), Some((from, to))) if p == from => Some(to),
            (prev, _) => prev,
        };
        self.current = false;
        Ok(released.value)
    }
}

impl<T, A, C> RbTree<T, A, C>
where
    A: Augment<T>,
{
    fn walk(&self, front: Option<NodeId>, back: Option<NodeId>) -> Walk<'_, T, A::Value> {
        Walk {
            nodes: &self.nodes,
            front,
            back,
        }
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T, A::Value> {
        Iter {
            walk: self.walk(self.first_id(), self.last_id()),
            remaining: self.len(),
        }
    }

    /// Iterates over the values in descending order.
    pub fn descending(&self) -> Rev<Iter<'_, T, A::Value>> {
        self.iter().rev()
    }

    /// Iterates over the nodes in ascending order of their values.
    pub fn nodes(&self) -> Nodes<'_, T, A::Value> {
        Nodes {
            walk: self.walk(self.first_id(), self.last_id()),
        }
    }
}

impl<T, A, C> RbTree<T, A, C>
where
    A: Augment<T>,
    C: Comparator<T>,
{
    /// Iterates in ascending order over the values between `lower` and
    /// `upper`.
    pub fn range(&self, lower: Bound<&T>, upper: Bound<&T>) -> Range<'_, T, A::Value> {
        let front = match lower {
            Bound::Included(v) => self.ceiling_id(v),
            Bound::Excluded(v) => self.higher_id(v),
            Bound::Unbounded => self.first_id(),
        };
        let back = match upper {
            Bound::Included(v) => self.floor_id(v),
            Bound::Excluded(v) => self.lower_id(v),
            Bound::Unbounded => self.last_id(),
        };
        let walk = match (front, back) {
            (Some(f), Some(b)) if self.compare_ids(f, b) != Ordering::Greater => {
                self.walk(front, back)
            }
            _ => self.walk(None, None),
        };
        Range { walk }
    }

    /// A cursor positioned before the first value.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, A, C> {
        CursorMut {
            tree: self,
            position: None,
            current: false,
        }
    }

    /// Removes every value for which `keep` returns false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.cursor_mut();
        loop {
            let retained = match cursor.next() {
                Some(v) => keep(v),
                None => break,
            };
            if !retained {
                let removed = cursor.remove();
                debug_assert!(removed.is_ok());
            }
        }
    }
}

impl<'a, T, A, C> IntoIterator for &'a RbTree<T, A, C>
where
    A: Augment<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
