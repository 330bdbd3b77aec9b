use std::{fmt, iter::FusedIterator};

use super::{
    arena::NodeId,
    btree::BTree,
    btree_traits::KeyComparator,
};
use crate::error::{BTreeSetError, Result};

/// In-order walk state: the current node, the next slot to look at and the
/// child index taken at every ancestor above it.
#[derive(Clone, Debug)]
struct Traversal {
    node: NodeId,
    index: usize,
    parent_index: Vec<usize>,
}

impl Traversal {
    /// Start at the leftmost leaf.
    fn first<T, C>(tree: &BTree<T, C>) -> Self {
        let mut node = tree.root();
        let mut parent_index = Vec::new();
        while !tree.node(node).is_leaf() {
            node = tree.node(node).child(0);
            parent_index.push(0);
        }
        Self {
            node,
            index: 0,
            parent_index,
        }
    }

    /// Position of the next key in ascending order, if any.
    fn advance<T, C>(&mut self, tree: &BTree<T, C>) -> Option<(NodeId, usize)> {
        let n = tree.node(self.node);

        if !n.is_leaf() {
            // the previous call emitted keys[index - 1] of this inner node,
            // continue with the leftmost leaf of the subtree after it
            self.parent_index.push(self.index);
            self.node = n.child(self.index);
            while !tree.node(self.node).is_leaf() {
                self.node = tree.node(self.node).child(0);
                self.parent_index.push(0);
            }
            self.index = 1;
            return Some((self.node, 0));
        }

        if self.index < n.len() {
            self.index += 1;
            return Some((self.node, self.index - 1));
        }

        // leaf exhausted: climb until an ancestor still has a key to emit
        loop {
            let index = self.parent_index.pop()?;
            self.node = tree.node(self.node).parent?;
            self.index = index;
            if self.index < tree.node(self.node).len() {
                break;
            }
        }
        self.index += 1;
        Some((self.node, self.index - 1))
    }
}

/// Ascending iterator over the keys of a tree.
///
/// The next element is computed one step ahead, so [`Iter::has_next`] is a
/// cheap check.
pub struct Iter<'a, T, C> {
    tree: &'a BTree<T, C>,
    traversal: Traversal,
    next: Option<&'a T>,
    remaining: usize,
}

impl<'a, T, C> Iter<'a, T, C> {
    pub(crate) fn new(tree: &'a BTree<T, C>) -> Self {
        let mut traversal = Traversal::first(tree);
        let next = traversal
            .advance(tree)
            .map(|(id, slot)| &tree.node(id).keys[slot]);
        Self {
            tree,
            traversal,
            next,
            remaining: tree.size(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<'a, T, C> Iterator for Iter<'a, T, C> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let current = self.next.take()?;
        let tree = self.tree;
        self.next = self
            .traversal
            .advance(tree)
            .map(|(id, slot)| &tree.node(id).keys[slot]);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, C> ExactSizeIterator for Iter<'_, T, C> {}

impl<T, C> FusedIterator for Iter<'_, T, C> {}

impl<T, C> Clone for Iter<'_, T, C> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            traversal: self.traversal.clone(),
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for Iter<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Ascending walk that can also remove the element it last returned.
///
/// A removal may split, steal or merge nodes anywhere along the path, so the
/// cursor does not try to follow it: after a successful [`Cursor::remove`] the
/// cursor is stale and `next` fails with [`BTreeSetError::StaleCursor`]. Take
/// a new cursor to keep going.
pub struct Cursor<'a, T, C> {
    tree: &'a mut BTree<T, C>,
    traversal: Traversal,
    next: Option<T>,
    last_returned: Option<T>,
    stale: bool,
}

impl<'a, T: Clone, C: KeyComparator<T>> Cursor<'a, T, C> {
    pub(crate) fn new(tree: &'a mut BTree<T, C>) -> Self {
        let mut traversal = Traversal::first(tree);
        let next = traversal
            .advance(tree)
            .map(|(id, slot)| tree.node(id).keys[slot].clone());
        Self {
            tree,
            traversal,
            next,
            last_returned: None,
            stale: false,
        }
    }

    pub fn has_next(&self) -> bool {
        !self.stale && self.next.is_some()
    }

    pub fn next(&mut self) -> Result<T> {
        if self.stale {
            return Err(BTreeSetError::StaleCursor);
        }
        let current = self.next.take().ok_or(BTreeSetError::NoSuchElement)?;
        let tree = &*self.tree;
        self.next = self
            .traversal
            .advance(tree)
            .map(|(id, slot)| tree.node(id).keys[slot].clone());
        self.last_returned = Some(current.clone());
        Ok(current)
    }

    /// Delete the element returned by the last `next` from the tree.
    pub fn remove(&mut self) -> Result<()> {
        let last = self
            .last_returned
            .take()
            .ok_or(BTreeSetError::NoSuchElement)?;
        self.tree.delete(&last)?;
        self.stale = true;
        self.next = None;
        Ok(())
    }
}
