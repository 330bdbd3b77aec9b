use std::{cmp::Ordering, fmt, mem};

use super::{
    arena::{Arena, NodeId},
    btree_traits::{BTreeConfig, KeyComparator},
    deletion::{DeletionResult, DeletionResultFlags},
    node::Node,
    tree_stats::TreeStats,
};
use crate::error::{BTreeSetError, Result, VerifyError};

/// Result of searching a single node for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The key sits at this index of the node.
    Found(usize),
    /// The key is absent here; index of the first greater key, which is also
    /// the child to descend into.
    Descend(usize),
}

/// Path of `(node, child index)` steps taken from the root.
type Path = Vec<(NodeId, usize)>;

pub struct BTree<T, C> {
    root: NodeId,
    nodes: Arena<Node<T>>,
    stats: TreeStats,
    config: BTreeConfig,
    key_comp: C,
}

impl<T, C: KeyComparator<T>> BTree<T, C> {
    pub fn new(config: BTreeConfig, key_comp: C) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, key_comp))
    }

    /// A tree with the default order, which needs no validation.
    pub fn with_default_config(key_comp: C) -> Self {
        Self::build(BTreeConfig::default(), key_comp)
    }

    fn build(config: BTreeConfig, key_comp: C) -> Self {
        let mut nodes = Arena::new();
        let mut stats = TreeStats::new(config.slot_max());
        let root = Self::empty_root(&mut nodes, &mut stats, &config);
        Self {
            root,
            nodes,
            stats,
            config,
            key_comp,
        }
    }

}

/// Reset
impl<T, C> BTree<T, C> {
    /// Drop every node and start over with an empty leaf root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.stats = TreeStats::new(self.config.slot_max());
        self.root = Self::empty_root(&mut self.nodes, &mut self.stats, &self.config);
    }

    fn empty_root(nodes: &mut Arena<Node<T>>, stats: &mut TreeStats, config: &BTreeConfig) -> NodeId {
        stats.leaves += 1;
        nodes.alloc(Node::new_leaf(None, config.order))
    }
}

/// Key comparison
impl<T, C: KeyComparator<T>> BTree<T, C> {
    fn compare(&self, a: &T, b: &T) -> Result<Ordering> {
        self.key_comp
            .compare(a, b)
            .ok_or(BTreeSetError::Unorderable)
    }

    fn key_less(&self, a: &T, b: &T) -> bool {
        self.key_comp.compare(a, b) == Some(Ordering::Less)
    }
}

/// Node allocation and access
impl<T, C> BTree<T, C> {
    fn new_leaf(&mut self, parent: Option<NodeId>) -> NodeId {
        self.stats.leaves += 1;
        self.nodes.alloc(Node::new_leaf(parent, self.config.order))
    }

    fn new_inner(&mut self, parent: Option<NodeId>) -> NodeId {
        self.stats.inner_nodes += 1;
        self.nodes.alloc(Node::new_inner(parent, self.config.order))
    }

    fn free_node(&mut self, id: NodeId) -> Node<T> {
        let node = self.nodes.take(id);
        if node.is_leaf() {
            self.stats.leaves -= 1;
        } else {
            self.stats.inner_nodes -= 1;
        }
        node
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    /// Point the children of `parent` from `first` onwards back at `parent`.
    fn adopt_children(&mut self, parent: NodeId, first: usize) {
        let count = self.node(parent).children.len();
        for slot in first..count {
            let child = self.node(parent).child(slot);
            self.nodes.get_mut(child).parent = Some(parent);
        }
    }
}

/// Access to the item count and shape
impl<T, C> BTree<T, C> {
    pub fn size(&self) -> usize {
        self.stats.size
    }

    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    pub fn config(&self) -> &BTreeConfig {
        &self.config
    }

    pub fn get_stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Number of levels; a tree whose root is a leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut n = self.node(self.root);
        while !n.is_leaf() {
            n = self.node(n.child(0));
            depth += 1;
        }
        depth
    }
}

/// Search
impl<T, C: KeyComparator<T>> BTree<T, C> {
    /// Binary search of a single node.
    pub(crate) fn child_to_insert_at(&self, id: NodeId, key: &T) -> Result<Slot> {
        let keys = &self.node(id).keys;
        let mut lo = 0;
        let mut hi = keys.len();
        while lo < hi {
            let mid = (lo + hi) >> 1;
            match self.compare(key, &keys[mid])? {
                Ordering::Less => hi = mid,
                Ordering::Greater => lo = mid + 1,
                Ordering::Equal => return Ok(Slot::Found(mid)),
            }
        }
        Ok(Slot::Descend(lo))
    }

    /// Whether `key` is stored anywhere in the tree.
    pub fn includes(&self, key: &T) -> Result<bool> {
        let mut id = self.root;
        loop {
            match self.child_to_insert_at(id, key)? {
                Slot::Found(_) => return Ok(true),
                Slot::Descend(slot) => {
                    let n = self.node(id);
                    if n.is_leaf() {
                        return Ok(false);
                    }
                    id = n.child(slot);
                }
            }
        }
    }

    /// Walk from the root towards `key`, recording each step in `path`. Stops at
    /// the node holding the key, or at the leaf where it would be inserted.
    fn descend(&self, key: &T, path: &mut Path) -> Result<(NodeId, Slot)> {
        let mut id = self.root;
        loop {
            match self.child_to_insert_at(id, key)? {
                found @ Slot::Found(_) => return Ok((id, found)),
                Slot::Descend(slot) => {
                    let n = self.node(id);
                    if n.is_leaf() {
                        return Ok((id, Slot::Descend(slot)));
                    }
                    path.push((id, slot));
                    id = n.child(slot);
                }
            }
        }
    }
}

/// Insertion
impl<T, C: KeyComparator<T>> BTree<T, C> {
    /// Insert `key` unless an equal key is present. Returns whether it was added.
    ///
    /// The key goes into a leaf. A node that overflows is split and its median
    /// promoted into the parent, repeating up the recorded path; a split root
    /// grows the tree by one level. All comparisons happen before the first
    /// mutation, so an `Unorderable` failure leaves the tree untouched.
    ///
    /// Nodes split only once they overflow, never pre-emptively on the way
    /// down, so the resulting shape differs from a top-down splitting B-tree
    /// even at even orders.
    pub fn insert(&mut self, key: T) -> Result<bool> {
        let mut path = Path::new();
        let (leaf, slot) = match self.descend(&key, &mut path)? {
            (_, Slot::Found(_)) => return Ok(false),
            (leaf, Slot::Descend(slot)) => (leaf, slot),
        };

        self.nodes.get_mut(leaf).insert_new_element(slot, key);
        self.stats.size += 1;

        let mut id = leaf;
        while self.node(id).len() > self.config.slot_max() {
            let (promoted, right) = self.split(id);
            match path.pop() {
                None => {
                    self.split_root(promoted, id, right);
                    break;
                }
                Some((parent, index)) => {
                    self.nodes
                        .get_mut(parent)
                        .insert_split_node(index, promoted, right);
                    id = parent;
                }
            }
        }

        self.self_verify();
        Ok(true)
    }

    /// Split an overflowing node around its lower median. The node keeps the
    /// keys before the median, a new right sibling takes the keys (and children)
    /// after it, and the median is handed back for promotion.
    fn split(&mut self, id: NodeId) -> (T, NodeId) {
        let (parent, right_keys, right_children, promoted) = {
            let n = self.nodes.get_mut(id);
            debug_assert!(n.len() > 1);
            let mid = (n.len() - 1) / 2;
            let right_keys = n.keys.split_off(mid + 1);
            let promoted = n.keys.remove(mid);
            let right_children = if n.is_leaf() {
                Vec::new()
            } else {
                n.children.split_off(mid + 1)
            };
            (n.parent, right_keys, right_children, promoted)
        };

        let right = if right_children.is_empty() {
            self.new_leaf(parent)
        } else {
            self.new_inner(parent)
        };
        {
            let r = self.nodes.get_mut(right);
            r.keys.extend(right_keys);
            r.children.extend(right_children);
        }
        self.adopt_children(right, 0);
        self.stats.splits += 1;

        log::debug!(
            "BTree::split {:?} into {} and {} keys, new sibling {:?}",
            id,
            self.node(id).len(),
            self.node(right).len(),
            right
        );

        (promoted, right)
    }

    /// Grow a level: a new root holding only `promoted` between `left` and `right`.
    fn split_root(&mut self, promoted: T, left: NodeId, right: NodeId) {
        let root = self.new_inner(None);
        {
            let r = self.nodes.get_mut(root);
            r.keys.push(promoted);
            r.children.push(left);
            r.children.push(right);
        }
        self.nodes.get_mut(left).parent = Some(root);
        self.nodes.get_mut(right).parent = Some(root);
        self.root = root;

        log::debug!("BTree::split_root new root {:?}, depth {}", root, self.depth());
    }
}

/// Erase
impl<T, C: KeyComparator<T>> BTree<T, C> {
    /// Remove the key equal to `key`, returning it along with the rebalancing
    /// steps taken.
    pub fn delete(&mut self, key: &T) -> Result<DeletionResult<T>> {
        let mut path = Path::new();
        let (id, slot) = match self.descend(key, &mut path)? {
            (id, Slot::Found(slot)) => (id, slot),
            (_, Slot::Descend(_)) => {
                log::trace!("BTree::delete key not present");
                return Ok(DeletionResult::not_found());
            }
        };

        let (leaf, slot) = if self.node(id).is_leaf() {
            (id, slot)
        } else {
            self.switch_with_successor(id, slot, &mut path)
        };

        let removed = self.nodes.get_mut(leaf).keys.remove(slot);
        self.stats.size -= 1;

        let flags = self.fix_after_deletion(leaf, path);

        self.self_verify();
        Ok(DeletionResult::removed(flags, removed))
    }

    /// Swap the key at `slot` of an inner node with its in-order successor, the
    /// leftmost key of the subtree to its right. Returns where the key now
    /// lives, which is always slot 0 of a leaf, and extends `path` down to it.
    fn switch_with_successor(&mut self, id: NodeId, slot: usize, path: &mut Path) -> (NodeId, usize) {
        path.push((id, slot + 1));
        let mut leaf = self.node(id).child(slot + 1);
        while !self.node(leaf).is_leaf() {
            path.push((leaf, 0));
            leaf = self.node(leaf).child(0);
        }

        let (holder, successor) = self.nodes.get2_mut(id, leaf);
        mem::swap(&mut holder.keys[slot], &mut successor.keys[0]);
        (leaf, 0)
    }

    /// Repair underflow left behind by a removal from `id`, walking back up the
    /// path. Merges take a key out of the parent, so the repair can cascade up
    /// to the root; an emptied root hands over to its only child.
    fn fix_after_deletion(&mut self, mut id: NodeId, mut path: Path) -> DeletionResultFlags {
        let mut flags = DeletionResultFlags::Ok;

        while let Some((parent, index)) = path.pop() {
            if self.node(id).len() >= self.config.slot_min() {
                return flags;
            }
            flags = flags | self.rebalance(id, parent, index);
            id = parent;
        }

        debug_assert_eq!(id, self.root);
        let root = self.node(id);
        if root.len() == 0 && !root.is_leaf() {
            let old = self.free_node(id);
            let child = old.children[0];
            self.nodes.get_mut(child).parent = None;
            self.root = child;
            flags = flags | DeletionResultFlags::RootShrunk;
            log::debug!("BTree::fix_after_deletion root shrunk to {:?}, depth {}", child, self.depth());
        }

        flags
    }

    /// Bring a short non-root node back to the minimum fill. Tries, in order:
    /// steal from the left sibling, steal from the right sibling, merge into
    /// the left sibling, merge with the right sibling.
    fn rebalance(&mut self, id: NodeId, parent: NodeId, index: usize) -> DeletionResultFlags {
        let min = self.config.slot_min();
        let (left, right) = {
            let p = self.node(parent);
            (
                index.checked_sub(1).map(|i| p.child(i)),
                p.children.get(index + 1).copied(),
            )
        };

        let left_spare = left.map_or(false, |l| self.node(l).len() > min);
        let right_spare = right.map_or(false, |r| self.node(r).len() > min);

        match (left, right) {
            (Some(left), _) if left_spare => {
                self.steal_left(id, left, parent, index);
                DeletionResultFlags::StoleLeft
            }
            (_, Some(right)) if right_spare => {
                self.steal_right(id, right, parent, index);
                DeletionResultFlags::StoleRight
            }
            (Some(left), _) => {
                self.merge_left(id, left, parent, index);
                DeletionResultFlags::MergedLeft
            }
            (None, Some(right)) => {
                self.merge_right(id, right, parent, index);
                DeletionResultFlags::MergedRight
            }
            (None, None) => DeletionResultFlags::Ok,
        }
    }

    /// Rotate the left sibling's last key up into the parent and the parent's
    /// separator down to the front of this node. Inner nodes take the sibling's
    /// last child along with it.
    fn steal_left(&mut self, id: NodeId, left: NodeId, parent: NodeId, index: usize) {
        let (key, child) = {
            let l = self.nodes.get_mut(left);
            let last = l.len() - 1;
            (l.keys.remove(last), l.children.pop())
        };
        let separator = mem::replace(&mut self.nodes.get_mut(parent).keys[index - 1], key);

        let n = self.nodes.get_mut(id);
        n.keys.insert(0, separator);
        if let Some(child) = child {
            n.children.insert(0, child);
            self.nodes.get_mut(child).parent = Some(id);
        }
        self.stats.steals += 1;

        log::debug!("BTree::steal_left into {:?} from {:?}", id, left);
    }

    /// Mirror of `steal_left` using the right sibling's first key and child.
    fn steal_right(&mut self, id: NodeId, right: NodeId, parent: NodeId, index: usize) {
        let (key, child) = {
            let r = self.nodes.get_mut(right);
            let child = if r.is_leaf() {
                None
            } else {
                Some(r.children.remove(0))
            };
            (r.keys.remove(0), child)
        };
        let separator = mem::replace(&mut self.nodes.get_mut(parent).keys[index], key);

        let n = self.nodes.get_mut(id);
        n.keys.push(separator);
        if let Some(child) = child {
            n.children.push(child);
            self.nodes.get_mut(child).parent = Some(id);
        }
        self.stats.steals += 1;

        log::debug!("BTree::steal_right into {:?} from {:?}", id, right);
    }

    /// Fold this node and the separator into the left sibling. The parent loses
    /// one key and one child.
    fn merge_left(&mut self, id: NodeId, left: NodeId, parent: NodeId, index: usize) {
        let absorbed = self.free_node(id);
        let separator = {
            let p = self.nodes.get_mut(parent);
            p.children.remove(index);
            p.keys.remove(index - 1)
        };
        self.absorb(left, separator, absorbed);

        log::debug!("BTree::merge_left {:?} into {:?}", id, left);
    }

    /// Fold the separator and the right sibling into this node. Only used for
    /// the leftmost child, which has no left sibling.
    fn merge_right(&mut self, id: NodeId, right: NodeId, parent: NodeId, index: usize) {
        let absorbed = self.free_node(right);
        let separator = {
            let p = self.nodes.get_mut(parent);
            p.children.remove(index + 1);
            p.keys.remove(index)
        };
        self.absorb(id, separator, absorbed);

        log::debug!("BTree::merge_right {:?} into {:?}", right, id);
    }

    /// Append `separator` and everything in `absorbed` to `into`.
    fn absorb(&mut self, into: NodeId, separator: T, absorbed: Node<T>) {
        let first_new_child = {
            let n = self.nodes.get_mut(into);
            let first = n.children.len();
            n.keys.push(separator);
            n.keys.extend(absorbed.keys);
            n.children.extend(absorbed.children);
            first
        };
        self.adopt_children(into, first_new_child);
        self.stats.merges += 1;
    }
}

/// Verification
impl<T, C: KeyComparator<T>> BTree<T, C> {
    /// Check every structural invariant: fill bounds, ordering and separation,
    /// child counts, parent links, equal leaf depth and the size counter.
    pub fn verify(&self) -> std::result::Result<(), VerifyError> {
        if !self.node(self.root).is_root() {
            return Err(VerifyError::ParentLink { depth: 0 });
        }

        let mut leaf_depth = None;
        let reachable = self.verify_node(self.root, None, None, 0, &mut leaf_depth)?;
        if self.nodes.len() != self.stats.nodes() {
            return Err(VerifyError::NodeCount {
                counted: self.stats.nodes(),
                live: self.nodes.len(),
            });
        }
        if reachable != self.stats.size {
            return Err(VerifyError::Size {
                counted: self.stats.size,
                reachable,
            });
        }
        Ok(())
    }

    fn verify_node<'a>(
        &'a self,
        id: NodeId,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> std::result::Result<usize, VerifyError> {
        let n = self.node(id);
        let (min, max) = (self.config.slot_min(), self.config.slot_max());
        if n.len() > max || (!n.is_root() && n.len() < min) {
            return Err(VerifyError::Fill {
                depth,
                len: n.len(),
                min,
                max,
            });
        }

        let ascending = n.keys.windows(2).all(|w| self.key_less(&w[0], &w[1]));
        let above_lower = match (lower, n.keys.first()) {
            (Some(lo), Some(first)) => self.key_less(lo, first),
            _ => true,
        };
        let below_upper = match (upper, n.keys.last()) {
            (Some(hi), Some(last)) => self.key_less(last, hi),
            _ => true,
        };
        if !(ascending && above_lower && below_upper) {
            return Err(VerifyError::Order { depth });
        }

        if n.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(VerifyError::UnevenLeaves {
                        expected,
                        found: depth,
                    })
                }
                Some(_) => {}
            }
            return Ok(n.len());
        }

        if n.children.len() != n.len() + 1 {
            return Err(VerifyError::ChildCount {
                depth,
                keys: n.len(),
                children: n.children.len(),
            });
        }

        let mut count = n.len();
        for (slot, &child) in n.children.iter().enumerate() {
            if self.node(child).parent != Some(id) {
                return Err(VerifyError::ParentLink { depth: depth + 1 });
            }
            let lo = if slot == 0 { lower } else { Some(&n.keys[slot - 1]) };
            let hi = n.keys.get(slot).or(upper);
            count += self.verify_node(child, lo, hi, depth + 1, leaf_depth)?;
        }
        Ok(count)
    }

    fn self_verify(&self) {
        if cfg!(debug_assertions) && self.config.self_verify {
            let result = self.verify();
            debug_assert!(result.is_ok(), "B-tree invariant broken: {:?}", result);
        }
    }
}

/// Debug
impl<T: fmt::Debug, C> BTree<T, C> {
    fn print_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let n = self.node(id);
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        writeln!(
            f,
            "node {:?} {} keys {:?}",
            id,
            if n.is_leaf() { "leaf" } else { "inner" },
            n.keys
        )?;

        for &child in &n.children {
            self.print_node(f, child, depth + 1)?;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "order {} size {}", self.config.order, self.stats.size)?;
        self.print_node(f, self.root, 0)
    }
}
