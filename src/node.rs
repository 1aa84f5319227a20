use std::fmt::{self, Debug};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    Red = 0,
    Black,
}

/// Handle of a node in a tree's arena.
///
/// A handle stays valid until the next mutation of the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A tree node stored in the arena.
///
/// Children are owned through the arena; `parent` is a back-reference used
/// only to walk upwards.
#[derive(Debug, Clone)]
pub(crate) struct Node<T, V> {
    pub(crate) value: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) color: Color,
    /// Parent depth + 1, or 0 at the root.
    pub(crate) depth: usize,
    /// Cached augmentation value for the subtree rooted here.
    pub(crate) aug: V,
}

impl<T, V> Node<T, V> {
    #[inline]
    pub(crate) fn new(value: T, aug: V, parent: Option<NodeId>, depth: usize) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent,
            color: Color::Red,
            depth,
            aug,
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A read-only view of a node, exposing its links for diagnostics.
pub struct NodeRef<'a, T, V> {
    nodes: &'a [Node<T, V>],
    id: NodeId,
}

impl<T, V> Clone for NodeRef<'_, T, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, V> Copy for NodeRef<'_, T, V> {}

impl<'a, T, V> NodeRef<'a, T, V> {
    #[inline]
    pub(crate) fn new(nodes: &'a [Node<T, V>], id: NodeId) -> Self {
        Self { nodes, id }
    }

    #[inline]
    fn node(&self) -> &'a Node<T, V> {
        &self.nodes[self.id.index()]
    }

    #[inline]
    fn link(&self, id: Option<NodeId>) -> Option<NodeRef<'a, T, V>> {
        id.map(|id| NodeRef::new(self.nodes, id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'a T {
        &self.node().value
    }

    pub fn color(&self) -> Color {
        self.node().color
    }

    /// Distance from the root; the root is at depth 0.
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// The augmentation value cached for the subtree rooted at this node.
    pub fn augment(&self) -> &'a V {
        &self.node().aug
    }

    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T, V>> {
        self.link(self.node().parent)
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, V>> {
        self.link(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, V>> {
        self.link(self.node().right)
    }
}

impl<T: Debug, V> Debug for NodeRef<'_, T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("color", &self.color())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links() {
        let mut nodes = vec![
            Node::new('B', (), None, 0),
            Node::new('A', (), Some(NodeId(0)), 1),
        ];
        nodes[0].left = Some(NodeId(1));
        nodes[0].color = Color::Black;

        let root = NodeRef::new(&nodes, NodeId(0));
        assert_eq!(*root.value(), 'B');
        assert_eq!(root.color(), Color::Black);
        assert!(!root.is_leaf());
        assert!(root.parent().is_none());
        assert!(root.right().is_none());

        let left = root.left().unwrap();
        assert_eq!(*left.value(), 'A');
        assert_eq!(left.depth(), 1);
        assert_eq!(left.color(), Color::Red);
        assert!(left.is_leaf());
        assert_eq!(left.parent().unwrap().id(), root.id());
    }
}
