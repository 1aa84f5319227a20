use std::{cmp::Ordering, fmt::Debug};

use proptest::prelude::*;

use crate::{
    augment::Augment,
    interval::Interval,
    node::{Color, NodeId},
    order::Comparator,
    tree::RbTree,
};

/// Largest bound produced by [`arbitrary_interval`].
pub(crate) const BOUND_MAX: i32 = 40;

/// Generate arbitrary valid intervals with even bounds from [0..=`BOUND_MAX`]
/// and random inclusivity, so odd probe points fall strictly between bounds.
pub(crate) fn arbitrary_interval() -> impl Strategy<Value = Interval<i32>> {
    (
        0..=BOUND_MAX / 2,
        0..=BOUND_MAX / 2,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_filter_map("empty interval", |(a, b, from_inclusive, to_inclusive)| {
            Interval::with_bounds(a * 2, from_inclusive, b * 2, to_inclusive).ok()
        })
}

/// Assert every structural invariant of `tree`:
///
/// * values are in strict ascending order;
/// * parent links mirror child links and the root has no parent;
/// * the root is black, no red node has a red child, and every path to a
///   missing child crosses the same number of black nodes;
/// * cached depths and augmentation values match a recomputation;
/// * every arena node is reachable from the root.
#[track_caller]
pub(crate) fn validate_tree_structure<T, A, C>(tree: &RbTree<T, A, C>)
where
    T: Debug,
    A: Augment<T>,
    A::Value: Debug,
    C: Comparator<T>,
{
    let Some(root) = tree.root else {
        assert_eq!(tree.len(), 0, "no root but arena holds nodes");
        return;
    };
    assert_eq!(tree.node_ref(root).parent, None, "root has a parent");
    assert_eq!(tree.node_ref(root).color, Color::Black, "red root");

    let mut black_height = None;
    let mut reachable = 0;
    // (node, black nodes on the path above it)
    let mut stack = vec![(root, 0_usize)];
    while let Some((id, blacks_above)) = stack.pop() {
        reachable += 1;
        let node = tree.node_ref(id);
        let blacks = blacks_above + usize::from(node.color == Color::Black);

        let want_depth = node.parent.map(|p| tree.node_ref(p).depth + 1).unwrap_or(0);
        assert_eq!(node.depth, want_depth, "stale depth at {:?}", node.value);

        let left = node.left.map(|l| &tree.node_ref(l).aug);
        let right = node.right.map(|r| &tree.node_ref(r).aug);
        assert_eq!(
            node.aug,
            A::compute(&node.value, left, right),
            "stale augmentation at {:?}",
            node.value
        );

        for (child, want) in [(node.left, Ordering::Less), (node.right, Ordering::Greater)] {
            let Some(child) = child else {
                match black_height {
                    None => black_height = Some(blacks),
                    Some(h) => assert_eq!(h, blacks, "unequal black height at {:?}", node.value),
                }
                continue;
            };
            let c = tree.node_ref(child);
            assert_eq!(c.parent, Some(id), "broken parent link at {:?}", c.value);
            assert_eq!(
                tree.comparator().compare(&c.value, &node.value),
                want,
                "misplaced child {:?} of {:?}",
                c.value,
                node.value
            );
            if node.color == Color::Red {
                assert_eq!(c.color, Color::Black, "red-red at {:?}", c.value);
            }
            stack.push((child, blacks));
        }
    }
    assert_eq!(reachable, tree.len(), "unreachable arena nodes");

    let values: Vec<_> = tree.iter().collect();
    assert_eq!(values.len(), tree.len());
    for w in values.windows(2) {
        assert_eq!(
            tree.comparator().compare(w[0], w[1]),
            Ordering::Less,
            "out of order: {:?}, {:?}",
            w[0],
            w[1]
        );
    }
}

/// The smallest and largest depth of any leaf in `tree`.
pub(crate) fn leaf_depths<T, A, C>(tree: &RbTree<T, A, C>) -> (usize, usize)
where
    A: Augment<T>,
{
    (0..tree.len())
        .map(NodeId)
        .map(|id| tree.node_ref(id))
        .filter(|n| n.is_leaf())
        .fold((usize::MAX, 0), |(min, max), n| {
            (min.min(n.depth), max.max(n.depth))
        })
}
