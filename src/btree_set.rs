use std::{cmp::Ordering, fmt};

use crate::btree_base::{
    btree::BTree,
    btree_traits::{BTreeConfig, FnComparator, KeyComparator},
    iter::{Cursor, Iter},
    tree_stats::TreeStats,
    NaturalOrder,
};
use crate::error::{BTreeSetError, Result, VerifyError};

/// An ordered set of distinct elements kept in a B-tree.
///
/// Elements are ordered by `C`, which defaults to their natural (`PartialOrd`)
/// order. A comparison the natural order cannot answer, such as one involving
/// a NaN, makes `add` fail with [`BTreeSetError::Unorderable`].
pub struct BTreeSet<T, C = NaturalOrder> {
    _tree: BTree<T, C>,
}

impl<T: PartialOrd> BTreeSet<T, NaturalOrder> {
    /// An empty set with the default order of 6.
    pub fn new() -> Self {
        Self {
            _tree: BTree::with_default_config(NaturalOrder),
        }
    }

    pub fn with_order(order: usize) -> Result<Self> {
        Self::with_config(BTreeConfig::new().order(order))
    }

    pub fn with_config(config: BTreeConfig) -> Result<Self> {
        Self::with_config_and_comparator(config, NaturalOrder)
    }

    /// Same as `new` followed by `add` for every element.
    pub fn new_from<I: IntoIterator<Item = T>>(elements: I) -> Result<Self> {
        let mut set = Self::new();
        for x in elements {
            set.add(x)?;
        }
        Ok(set)
    }
}

impl<T, F> BTreeSet<T, FnComparator<F>>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// An empty set ordered by `compare` instead of the natural order.
    pub fn with_comparator(order: usize, compare: F) -> Result<Self> {
        Self::with_config_and_comparator(BTreeConfig::new().order(order), FnComparator::new(compare))
    }
}

impl<T, C: KeyComparator<T>> BTreeSet<T, C> {
    pub fn with_config_and_comparator(config: BTreeConfig, key_comp: C) -> Result<Self> {
        Ok(Self {
            _tree: BTree::new(config, key_comp)?,
        })
    }

    /// Add `x` unless an equal element is already present. Passing `None` is
    /// rejected with [`BTreeSetError::InvalidArgument`].
    pub fn add(&mut self, x: impl Into<Option<T>>) -> Result<bool> {
        let x = x
            .into()
            .ok_or(BTreeSetError::InvalidArgument("cannot add an absent element"))?;
        self._tree.insert(x)
    }

    /// Elements that cannot be compared are never contained.
    pub fn contains(&self, x: &T) -> bool {
        self._tree.includes(x).unwrap_or(false)
    }

    /// Remove the element equal to `x`. Returns whether one was removed; `None`
    /// and incomparable elements remove nothing.
    pub fn remove<'a>(&mut self, x: impl Into<Option<&'a T>>) -> bool
    where
        T: 'a,
    {
        match x.into() {
            Some(x) => self.take(x).is_some(),
            None => false,
        }
    }

    /// Remove and return the stored element equal to `x`.
    pub fn take(&mut self, x: &T) -> Option<T> {
        match self._tree.delete(x) {
            Ok(result) => result.removed,
            Err(err) => {
                log::debug!("BTreeSet::take failed: {}", err);
                None
            }
        }
    }

    /// Keep only the elements for which `keep` returns true.
    pub fn retain<P>(&mut self, mut keep: P)
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        let doomed: Vec<T> = self.iter().filter(|x| !keep(*x)).cloned().collect();
        for x in &doomed {
            self.remove(x);
        }
    }

    /// A walk that can remove the element it last returned. See [`Cursor`].
    pub fn cursor(&mut self) -> Cursor<'_, T, C>
    where
        T: Clone,
    {
        Cursor::new(&mut self._tree)
    }

    /// Check every structural invariant of the underlying tree.
    pub fn verify(&self) -> std::result::Result<(), VerifyError> {
        self._tree.verify()
    }
}

impl<T, C> BTreeSet<T, C> {
    pub fn len(&self) -> usize {
        self._tree.size()
    }

    /// Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self._tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self._tree.empty()
    }

    pub fn clear(&mut self) {
        self._tree.clear();
    }

    /// Elements in ascending order. Take a fresh iterator after any mutation.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter::new(&self._tree)
    }

    pub fn order(&self) -> usize {
        self._tree.config().order
    }

    /// Levels in the tree; 1 while the root is a leaf.
    pub fn depth(&self) -> usize {
        self._tree.depth()
    }

    pub fn stats(&self) -> &TreeStats {
        self._tree.get_stats()
    }
}

impl<T: PartialOrd> Default for BTreeSet<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for BTreeSet<T, NaturalOrder> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, C: KeyComparator<T>> Extend<T> for BTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            if let Err(err) = self.add(x) {
                log::warn!("BTreeSet::extend dropped an element: {}", err);
            }
        }
    }
}

impl<'a, T, C> IntoIterator for &'a BTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Iter<'a, T, C> {
        self.iter()
    }
}

impl<T: PartialEq, C, D> PartialEq<BTreeSet<T, D>> for BTreeSet<T, C> {
    fn eq(&self, other: &BTreeSet<T, D>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTreeSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
