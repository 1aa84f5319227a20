use std::{
    cmp::Ordering,
    fmt::{self, Debug, Write},
    marker::PhantomData,
};

use log::{debug, trace};

use crate::{
    augment::{Augment, NoAugment},
    node::{Color, Node, NodeId, NodeRef},
    order::{Comparator, NaturalOrder},
};

pub(crate) fn subtree_min<T, V>(nodes: &[Node<T, V>], mut id: NodeId) -> NodeId {
    while let Some(l) = nodes[id.index()].left {
        id = l;
    }
    id
}

pub(crate) fn subtree_max<T, V>(nodes: &[Node<T, V>], mut id: NodeId) -> NodeId {
    while let Some(r) = nodes[id.index()].right {
        id = r;
    }
    id
}

/// The next node in order, or `None` at the last node.
pub(crate) fn successor<T, V>(nodes: &[Node<T, V>], id: NodeId) -> Option<NodeId> {
    if let Some(r) = nodes[id.index()].right {
        return Some(subtree_min(nodes, r));
    }
    let mut child = id;
    let mut parent = nodes[id.index()].parent;
    while let Some(p) = parent {
        if nodes[p.index()].right != Some(child) {
            break;
        }
        child = p;
        parent = nodes[p.index()].parent;
    }
    parent
}

/// The previous node in order, or `None` at the first node.
pub(crate) fn predecessor<T, V>(nodes: &[Node<T, V>], id: NodeId) -> Option<NodeId> {
    if let Some(l) = nodes[id.index()].left {
        return Some(subtree_max(nodes, l));
    }
    let mut child = id;
    let mut parent = nodes[id.index()].parent;
    while let Some(p) = parent {
        if nodes[p.index()].left != Some(child) {
            break;
        }
        child = p;
        parent = nodes[p.index()].parent;
    }
    parent
}

/// A node removed from the arena.
pub(crate) struct Released<T> {
    pub(crate) value: T,
    /// The arena slot compaction moved the node at `.0` to `.1`.
    pub(crate) moved: Option<(NodeId, NodeId)>,
}

/// A red-black tree holding a set of `T` ordered by a [`Comparator`].
///
/// Nodes live in an arena and link to each other by [`NodeId`]; the parent
/// link is a back-reference used only for walking upwards. Every node caches
/// its depth and an [`Augment`] value for its subtree, both kept consistent
/// through every rotation, insertion and deletion.
///
/// Values comparing equal under the comparator are the same set member: a
/// second insert of an equal value is a no-op.
///
/// The tree is not synchronised. Mutating it while an iterator over it is
/// alive is prevented by the borrow checker; a [`NodeId`] obtained before a
/// mutation must not be used after it.
pub struct RbTree<T, A = NoAugment, C = NaturalOrder>
where
    A: Augment<T>,
{
    pub(crate) nodes: Vec<Node<T, A::Value>>,
    pub(crate) root: Option<NodeId>,
    comparator: C,
    _augment: PhantomData<fn() -> A>,
}

impl<T, A> RbTree<T, A, NaturalOrder>
where
    T: Ord,
    A: Augment<T>,
{
    /// Creates an empty tree ordered by `T`'s [`Ord`] implementation.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T, A, C> Default for RbTree<T, A, C>
where
    A: Augment<T>,
    C: Comparator<T> + Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, A, C> Clone for RbTree<T, A, C>
where
    T: Clone,
    A: Augment<T>,
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            _augment: PhantomData,
        }
    }
}

impl<T: Debug, A: Augment<T>, C> Debug for RbTree<T, A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, A, C> RbTree<T, A, C>
where
    A: Augment<T>,
{
    /// Creates an empty tree ordered by `comparator`.
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            comparator,
            _augment: PhantomData,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of values in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every value.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} values", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    pub fn root(&self) -> Option<NodeRef<'_, T, A::Value>> {
        self.root.map(|id| NodeRef::new(&self.nodes, id))
    }

    /// The node behind `id`, if the handle is still in range.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, A::Value>> {
        (id.index() < self.nodes.len()).then(|| NodeRef::new(&self.nodes, id))
    }

    /// Number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(0)
    }

    pub fn first(&self) -> Option<&T> {
        self.first_id().map(|id| self.value(id))
    }

    pub fn last(&self) -> Option<&T> {
        self.last_id().map(|id| self.value(id))
    }

    pub(crate) fn first_id(&self) -> Option<NodeId> {
        self.root.map(|r| subtree_min(&self.nodes, r))
    }

    pub(crate) fn last_id(&self) -> Option<NodeId> {
        self.root.map(|r| subtree_max(&self.nodes, r))
    }

    /// Recursively print out the tree, one node per line, for debugging
    /// purposes. The output format is not guaranteed to be stable.
    pub fn dump(&self) -> String
    where
        T: Debug,
    {
        let mut buf = String::new();
        let Some(root) = self.root else {
            return buf;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node_ref(id);
            let side = match node.parent {
                None => "root",
                Some(p) if self.node_ref(p).left == Some(id) => "left",
                Some(_) => "right",
            };
            let indent = node.depth * 2;
            // Writing to a String cannot fail.
            let _ = writeln!(
                buf,
                "{:indent$}{:?} ({:?}, depth {}, {})",
                "",
                node.value,
                node.color,
                node.depth,
                side,
            );
            stack.extend(node.right);
            stack.extend(node.left);
        }
        buf
    }

    #[inline]
    pub(crate) fn node_ref(&self, id: NodeId) -> &Node<T, A::Value> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T, A::Value> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> &T {
        &self.node_ref(id).value
    }

    #[inline]
    pub(crate) fn parent_of(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node_ref(id).parent)
    }

    #[inline]
    pub(crate) fn left_of(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node_ref(id).left)
    }

    #[inline]
    pub(crate) fn right_of(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.and_then(|id| self.node_ref(id).right)
    }

    /// Absent children count as black.
    #[inline]
    pub(crate) fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map(|id| self.node_ref(id).color).unwrap_or(Color::Black)
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.node_mut(id).color = color;
        }
    }

    /// Recomputes the augmentation value of `id` from its payload and its
    /// children, returning true if it changed.
    fn recompute(&mut self, id: NodeId) -> bool {
        let node = self.node_ref(id);
        let left = node.left.map(|l| &self.node_ref(l).aug);
        let right = node.right.map(|r| &self.node_ref(r).aug);
        let aug = A::compute(&node.value, left, right);

        let node = self.node_mut(id);
        if node.aug == aug {
            return false;
        }
        node.aug = aug;
        true
    }

    /// Recomputes augmentation values from `id` towards the root, stopping at
    /// the first node whose value is unchanged.
    pub(crate) fn propagate(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(id) = cur {
            if !self.recompute(id) {
                break;
            }
            cur = self.node_ref(id).parent;
        }
    }

    /// Resets the depth of `id` from its parent and pushes the change down to
    /// every descendant whose depth no longer matches.
    pub(crate) fn refresh_depth(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let want = self
                .parent_of(Some(n))
                .map(|p| self.node_ref(p).depth + 1)
                .unwrap_or(0);
            let node = self.node_mut(n);
            if node.depth == want && n != id {
                continue;
            }
            node.depth = want;
            stack.extend(node.left);
            stack.extend(node.right);
        }
    }

    /// Links `child` into the slot `old` occupies under `parent` (or the root
    /// slot).
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<NodeId>,
        old: NodeId,
        child: Option<NodeId>,
    ) {
        match parent {
            None => self.root = child,
            Some(p) if self.node_ref(p).left == Some(old) => self.node_mut(p).left = child,
            Some(p) => self.node_mut(p).right = child,
        }
    }

    /// Left rotation around `p`, from CLR:
    ///
    /// ```text
    ///      |            |
    ///      p            r
    ///     / \          / \
    ///        r    =>  p
    ///       / \      / \
    ///      c            c
    /// ```
    ///
    /// A no-op if `p` is absent or has no right child.
    pub(crate) fn rotate_left(&mut self, p: Option<NodeId>) {
        let Some(p) = p else { return };
        let Some(r) = self.node_ref(p).right else {
            return;
        };

        let c = self.node_ref(r).left;
        self.node_mut(p).right = c;
        if let Some(c) = c {
            self.node_mut(c).parent = Some(p);
        }

        let pp = self.node_ref(p).parent;
        self.node_mut(r).parent = pp;
        self.replace_child(pp, p, Some(r));

        self.node_mut(r).left = Some(p);
        self.node_mut(p).parent = Some(r);

        self.refresh_depth(r);
        self.recompute(p);
        self.propagate(r);
    }

    /// Right rotation around `p`, the mirror of [`Self::rotate_left`]:
    ///
    /// ```text
    ///      |            |
    ///      p            l
    ///     / \          / \
    ///    l       =>       p
    ///   / \              / \
    ///      c            c
    /// ```
    pub(crate) fn rotate_right(&mut self, p: Option<NodeId>) {
        let Some(p) = p else { return };
        let Some(l) = self.node_ref(p).left else {
            return;
        };

        let c = self.node_ref(l).right;
        self.node_mut(p).left = c;
        if let Some(c) = c {
            self.node_mut(c).parent = Some(p);
        }

        let pp = self.node_ref(p).parent;
        self.node_mut(l).parent = pp;
        self.replace_child(pp, p, Some(l));

        self.node_mut(l).right = Some(p);
        self.node_mut(p).parent = Some(l);

        self.refresh_depth(l);
        self.recompute(p);
        self.propagate(l);
    }

    /// Removes the detached node `id` from the arena, moving the last arena
    /// node into its slot.
    pub(crate) fn release(&mut self, id: NodeId) -> Released<T> {
        debug_assert!(self.node_ref(id).is_leaf() && self.node_ref(id).parent.is_none());
        debug_assert_ne!(self.root, Some(id));

        let last = NodeId(self.nodes.len() - 1);
        let node = self.nodes.swap_remove(id.index());
        if id == last {
            return Released {
                value: node.value,
                moved: None,
            };
        }

        // The node formerly at `last` now sits at `id`: re-point its
        // neighbours.
        let moved = self.node_ref(id);
        let (parent, left, right) = (moved.parent, moved.left, moved.right);
        self.replace_child(parent, last, Some(id));
        for child in [left, right].into_iter().flatten() {
            self.node_mut(child).parent = Some(id);
        }

        Released {
            value: node.value,
            moved: Some((last, id)),
        }
    }
}

impl<T, A, C> RbTree<T, A, C>
where
    A: Augment<T>,
    C: Comparator<T>,
{
    #[inline]
    fn compare(&self, value: &T, id: NodeId) -> Ordering {
        self.comparator.compare(value, self.value(id))
    }

    /// Inserts `value`, returning whether it was added and the node holding
    /// it (the existing node if an equal value was already present).
    pub fn insert(&mut self, value: T) -> (bool, NodeId) {
        let mut parent = None;
        let mut cur = self.root;
        let mut ord = Ordering::Equal;
        while let Some(id) = cur {
            parent = Some(id);
            ord = self.compare(&value, id);
            cur = match ord {
                Ordering::Less => self.node_ref(id).left,
                Ordering::Greater => self.node_ref(id).right,
                Ordering::Equal => return (false, id),
            };
        }

        let id = NodeId(self.nodes.len());
        let depth = parent.map(|p| self.node_ref(p).depth + 1).unwrap_or(0);
        let aug = A::compute(&value, None, None);
        self.nodes.push(Node::new(value, aug, parent, depth));

        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if ord == Ordering::Less {
                    self.node_mut(p).left = Some(id);
                } else {
                    self.node_mut(p).right = Some(id);
                }
                self.propagate(p);
            }
        }
        trace!("inserted node {:?} at depth {}", id, depth);

        self.fix_after_insertion(id);
        (true, id)
    }

    /// Inserts every value, returning true if any of them was added.
    pub fn insert_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .fold(false, |modified, v| self.insert(v).0 || modified)
    }

    /// Removes the value equal to `value`, returning whether one was present.
    pub fn delete(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let id = self.find_id(value)?;
        Some(self.delete_node(id).value)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        let id = self.first_id()?;
        Some(self.delete_node(id).value)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        let id = self.last_id()?;
        Some(self.delete_node(id).value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.find_id(value).is_some()
    }

    /// The stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.find_id(value).map(|id| self.value(id))
    }

    /// The node holding the value equal to `value`.
    pub fn find(&self, value: &T) -> Option<NodeRef<'_, T, A::Value>> {
        self.find_id(value).map(|id| NodeRef::new(&self.nodes, id))
    }

    /// The greatest value less than or equal to `value`.
    pub fn floor(&self, value: &T) -> Option<&T> {
        self.floor_id(value).map(|id| self.value(id))
    }

    /// The least value greater than or equal to `value`.
    pub fn ceiling(&self, value: &T) -> Option<&T> {
        self.ceiling_id(value).map(|id| self.value(id))
    }

    /// The greatest value strictly less than `value`.
    pub fn lower(&self, value: &T) -> Option<&T> {
        self.lower_id(value).map(|id| self.value(id))
    }

    /// The least value strictly greater than `value`.
    pub fn higher(&self, value: &T) -> Option<&T> {
        self.higher_id(value).map(|id| self.value(id))
    }

    pub(crate) fn find_id(&self, value: &T) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            cur = match self.compare(value, id) {
                Ordering::Less => self.node_ref(id).left,
                Ordering::Greater => self.node_ref(id).right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Walks down to where `value` would sit. `inclusive` accepts an equal
    /// node as the answer; `upwards` selects the ceiling/higher family.
    fn bound_id(&self, value: &T, inclusive: bool, upwards: bool) -> Option<NodeId> {
        let mut best = None;
        let mut cur = self.root;
        while let Some(id) = cur {
            let ord = self.compare(value, id);
            if ord == Ordering::Equal && inclusive {
                return Some(id);
            }
            let node = self.node_ref(id);
            cur = match (upwards, ord) {
                // Looking for something larger: this node qualifies, try to
                // find a smaller qualifying one on the left.
                (true, Ordering::Less) => {
                    best = Some(id);
                    node.left
                }
                (true, _) => node.right,
                (false, Ordering::Greater) => {
                    best = Some(id);
                    node.right
                }
                (false, _) => node.left,
            };
        }
        best
    }

    pub(crate) fn floor_id(&self, value: &T) -> Option<NodeId> {
        self.bound_id(value, true, false)
    }

    pub(crate) fn ceiling_id(&self, value: &T) -> Option<NodeId> {
        self.bound_id(value, true, true)
    }

    pub(crate) fn lower_id(&self, value: &T) -> Option<NodeId> {
        self.bound_id(value, false, false)
    }

    pub(crate) fn higher_id(&self, value: &T) -> Option<NodeId> {
        self.bound_id(value, false, true)
    }

    #[inline]
    pub(crate) fn compare_ids(&self, a: NodeId, b: NodeId) -> Ordering {
        self.comparator.compare(self.value(a), self.value(b))
    }
}
