//! Red-black balancing for [`RbTree`], after Cormen, Leiserson and Rivest.
//!
//! The invariants restored after every insertion and deletion:
//!
//! * every node is red or black, and the root is black;
//! * a red node has no red child;
//! * every path from a node down to a missing child crosses the same number
//!   of black nodes.

use log::trace;

use crate::{
    augment::Augment,
    node::{Color, NodeId},
    tree::{successor, Released, RbTree},
};

impl<T, A, C> RbTree<T, A, C>
where
    A: Augment<T>,
{
    /// Restores the red-black invariants after `x` was attached as a red
    /// leaf.
    pub(crate) fn fix_after_insertion(&mut self, x: NodeId) {
        self.node_mut(x).color = Color::Red;

        let mut x = Some(x);
        while x.is_some() && x != self.root && self.color_of(self.parent_of(x)) == Color::Red {
            let p = self.parent_of(x);
            let g = self.parent_of(p);
            if p == self.left_of(g) {
                let uncle = self.right_of(g);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    x = g;
                } else {
                    if x == self.right_of(p) {
                        x = p;
                        self.rotate_left(x);
                    }
                    let p = self.parent_of(x);
                    let g = self.parent_of(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left_of(g);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    x = g;
                } else {
                    if x == self.left_of(p) {
                        x = p;
                        self.rotate_right(x);
                    }
                    let p = self.parent_of(x);
                    let g = self.parent_of(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }

        self.set_color(self.root, Color::Black);
    }

    /// Unlinks `p` from the tree and releases it from the arena, returning its
    /// payload.
    ///
    /// A node with two children takes its successor's payload and the
    /// successor's node is unlinked instead. A leaf stands in as the missing
    /// child during fix-up and is detached only afterwards.
    pub(crate) fn delete_node(&mut self, mut p: NodeId) -> Released<T> {
        let node = self.node_ref(p);
        if node.left.is_some() && node.right.is_some() {
            if let Some(s) = successor(&self.nodes, p) {
                self.swap_values(p, s);
                self.propagate(p);
                p = s;
            }
        }

        let node = self.node_ref(p);
        let parent = node.parent;
        let color = node.color;
        let replacement = node.left.or(node.right);

        if let Some(rep) = replacement {
            self.node_mut(rep).parent = parent;
            self.replace_child(parent, p, Some(rep));
            let node = self.node_mut(p);
            node.left = None;
            node.right = None;
            node.parent = None;

            self.refresh_depth(rep);
            if let Some(parent) = parent {
                self.propagate(parent);
            }
            if color == Color::Black {
                self.fix_after_deletion(rep);
            }
        } else if parent.is_none() {
            self.root = None;
        } else {
            if color == Color::Black {
                self.fix_after_deletion(p);
            }
            // Fix-up may have rotated `p` under a different parent.
            if let Some(parent) = self.node_ref(p).parent {
                self.replace_child(Some(parent), p, None);
                self.node_mut(p).parent = None;
                self.propagate(parent);
            }
        }

        trace!("deleted node {:?}, {} values left", p, self.len() - 1);
        self.release(p)
    }

    fn swap_values(&mut self, a: NodeId, b: NodeId) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi.index());
        std::mem::swap(&mut head[lo.index()].value, &mut tail[0].value);
    }

    /// Restores the red-black invariants after a black node was removed
    /// above `x`, which now carries an extra black.
    fn fix_after_deletion(&mut self, x: NodeId) {
        let mut x = Some(x);
        while x != self.root && self.color_of(x) == Color::Black {
            if x == self.left_of(self.parent_of(x)) {
                let mut sib = self.right_of(self.parent_of(x));

                if self.color_of(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(self.parent_of(x), Color::Red);
                    self.rotate_left(self.parent_of(x));
                    sib = self.right_of(self.parent_of(x));
                }

                if self.color_of(self.left_of(sib)) == Color::Black
                    && self.color_of(self.right_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = self.parent_of(x);
                } else {
                    if self.color_of(self.right_of(sib)) == Color::Black {
                        self.set_color(self.left_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        self.rotate_right(sib);
                        sib = self.right_of(self.parent_of(x));
                    }
                    self.set_color(sib, self.color_of(self.parent_of(x)));
                    self.set_color(self.parent_of(x), Color::Black);
                    self.set_color(self.right_of(sib), Color::Black);
                    self.rotate_left(self.parent_of(x));
                    x = self.root;
                }
            } else {
                let mut sib = self.left_of(self.parent_of(x));

                if self.color_of(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(self.parent_of(x), Color::Red);
                    self.rotate_right(self.parent_of(x));
                    sib = self.left_of(self.parent_of(x));
                }

                if self.color_of(self.right_of(sib)) == Color::Black
                    && self.color_of(self.left_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = self.parent_of(x);
                } else {
                    if self.color_of(self.left_of(sib)) == Color::Black {
                        self.set_color(self.right_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        self.rotate_left(sib);
                        sib = self.left_of(self.parent_of(x));
                    }
                    self.set_color(sib, self.color_of(self.parent_of(x)));
                    self.set_color(self.parent_of(x), Color::Black);
                    self.set_color(self.left_of(sib), Color::Black);
                    self.rotate_right(self.parent_of(x));
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    use crate::{
        augment::SubtreeCount,
        test_utils::{leaf_depths, validate_tree_structure},
        RbTree,
    };

    #[test]
    fn insert_ascending_stays_balanced() {
        let mut tree: RbTree<u32, SubtreeCount> = RbTree::new();
        for v in 0..1024 {
            tree.insert(v);
        }
        validate_tree_structure(&tree);
        // 2 * log2(1025) bounds the height of any red-black tree of 1024 nodes.
        assert!(tree.height() <= 20, "height {}", tree.height());
        assert_eq!(tree.root().unwrap().augment(), &1024);
    }

    #[test]
    fn leaf_depths_stay_within_factor_two() {
        let mut tree: RbTree<u32> = RbTree::new();
        for v in 0..=10_000 {
            tree.insert(v);
            let (min, max) = leaf_depths(&tree);
            assert!(max <= 2 * min + 1, "after {v}: min {min}, max {max}");
        }
        validate_tree_structure(&tree);
    }

    #[test]
    fn delete_in_random_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut values: Vec<u32> = (0..500).collect();
        values.shuffle(&mut rng);

        let mut tree: RbTree<u32, SubtreeCount> = RbTree::new();
        tree.insert_all(values.iter().copied());
        validate_tree_structure(&tree);

        values.shuffle(&mut rng);
        for (i, v) in values.iter().enumerate() {
            assert_eq!(tree.take(v), Some(*v));
            if i % 25 == 0 {
                validate_tree_structure(&tree);
            }
        }
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
    }

    #[test]
    fn delete_node_with_two_children_keeps_payloads() {
        let mut tree: RbTree<u32> = RbTree::new();
        tree.insert_all([50, 30, 70, 20, 40, 60, 80]);
        let root = *tree.root().unwrap().value();
        assert_eq!(tree.take(&root), Some(root));
        assert!(!tree.contains(&root));
        validate_tree_structure(&tree);
        assert_eq!(tree.len(), 6);
    }
}
