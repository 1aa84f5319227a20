/// Per-subtree data cached on every node and kept consistent bottom-up
/// through every structural change (attach, detach, rotation, deletion
/// splice and payload replacement).
///
/// `compute` must be a pure function of the node's own payload and the
/// cached values of its children. The tree stops propagating a change
/// upwards as soon as a recomputed value equals the cached one.
pub trait Augment<T> {
    type Value: Clone + PartialEq;

    fn compute(value: &T, left: Option<&Self::Value>, right: Option<&Self::Value>) -> Self::Value;
}

/// No augmentation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoAugment;

impl<T> Augment<T> for NoAugment {
    type Value = ();

    #[inline]
    fn compute(_value: &T, _left: Option<&()>, _right: Option<&()>) {}
}

/// Number of payloads in the subtree rooted at each node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubtreeCount;

impl<T> Augment<T> for SubtreeCount {
    type Value = usize;

    #[inline]
    fn compute(_value: &T, left: Option<&usize>, right: Option<&usize>) -> usize {
        1 + left.copied().unwrap_or(0) + right.copied().unwrap_or(0)
    }
}
