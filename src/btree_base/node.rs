use super::arena::NodeId;

/// A B-tree node. `keys[i]` separates `children[i]` (smaller keys) from
/// `children[i + 1]` (larger keys). Leaves have no children.
#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub keys: Vec<T>,
    pub children: Vec<NodeId>,
    /// Navigation only; ownership flows from parent to child.
    pub parent: Option<NodeId>,
}

impl<T> Node<T> {
    pub fn new_leaf(parent: Option<NodeId>, order: usize) -> Self {
        Self {
            // one spare slot for the key that overflows a full node before it splits
            keys: Vec::with_capacity(order),
            children: Vec::new(),
            parent,
        }
    }

    pub fn new_inner(parent: Option<NodeId>, order: usize) -> Self {
        Self {
            keys: Vec::with_capacity(order),
            children: Vec::with_capacity(order + 1),
            parent,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn child(&self, slot: usize) -> NodeId {
        self.children[slot]
    }

    /// Shift keys right of `slot` and store `key` there.
    pub fn insert_new_element(&mut self, slot: usize, key: T) {
        debug_assert!(self.is_leaf());
        self.keys.insert(slot, key);
    }

    /// Install a promoted key at `slot`, with `right` as the child just after it.
    /// The child at `slot` keeps holding the left half of the split.
    pub fn insert_split_node(&mut self, slot: usize, key: T, right: NodeId) {
        debug_assert!(!self.is_leaf());
        self.keys.insert(slot, key);
        self.children.insert(slot + 1, right);
    }
}
