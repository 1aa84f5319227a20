//! The plain ordered set: an [`RbTree`] without augmentation.

use crate::{
    augment::{Augment, NoAugment},
    order::{Comparator, NaturalOrder},
    tree::RbTree,
};

/// An ordered set of `T`, balanced as a red-black tree.
///
/// ```
/// use interval_rbset::RbSet;
///
/// let mut set: RbSet<char> = "HADZBCJGIEF".chars().collect();
/// set.delete(&'Z');
/// assert_eq!(set.iter().collect::<String>(), "ABCDEFGHIJ");
/// assert_eq!(set.ceiling(&'C'), Some(&'C'));
/// ```
pub type RbSet<T, C = NaturalOrder> = RbTree<T, NoAugment, C>;

impl<T, A, C> FromIterator<T> for RbTree<T, A, C>
where
    A: Augment<T>,
    C: Comparator<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.insert_all(iter);
        tree
    }
}

impl<T, A, C> Extend<T> for RbTree<T, A, C>
where
    A: Augment<T>,
    C: Comparator<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}
