/// Index of a node inside an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn from_index(index: usize) -> Self {
        assert!(index < u32::MAX as usize, "node arena is full");
        Self(index as u32)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slot storage for tree nodes. Freed slots are recycled through a free list,
/// so a `NodeId` is only meaningful while its node is alive.
#[derive(Clone, Debug)]
pub(crate) struct Arena<N> {
    slots: Vec<Option<N>>,
    free: Vec<NodeId>,
}

impl<N> Arena<N> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn alloc(&mut self, node: N) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::from_index(self.slots.len());
                self.slots.push(Some(node));
                id
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &N {
        self.slots[id.index()]
            .as_ref()
            .expect("`Arena::get()` - node was freed")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut N {
        self.slots[id.index()]
            .as_mut()
            .expect("`Arena::get_mut()` - node was freed")
    }

    /// Mutable access to two distinct nodes at once.
    pub(crate) fn get2_mut(&mut self, a: NodeId, b: NodeId) -> (&mut N, &mut N) {
        assert_ne!(a, b, "`Arena::get2_mut()` - same node twice");
        let (lo, hi, swapped) = if a.index() < b.index() {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo]
            .as_mut()
            .expect("`Arena::get2_mut()` - node was freed");
        let second = tail[0]
            .as_mut()
            .expect("`Arena::get2_mut()` - node was freed");
        if swapped {
            (second, first)
        } else {
            (first, second)
        }
    }

    pub(crate) fn take(&mut self, id: NodeId) -> N {
        let node = self.slots[id.index()]
            .take()
            .expect("`Arena::take()` - node was freed");
        self.free.push(id);
        node
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.take(a), "a");
        assert_eq!(arena.len(), 1);

        let c = arena.alloc("c");
        assert_eq!(c, a);
        assert_eq!(*arena.get(c), "c");
        assert_eq!(*arena.get(b), "b");
    }

    #[test]
    fn get2_mut_keeps_argument_order() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);

        let (x, y) = arena.get2_mut(b, a);
        assert_eq!((*x, *y), (2, 1));
        std::mem::swap(x, y);

        assert_eq!(*arena.get(a), 2);
        assert_eq!(*arena.get(b), 1);
    }

    #[test]
    #[should_panic(expected = "node was freed")]
    fn stale_id_panics() {
        let mut arena = Arena::new();
        let a = arena.alloc(1);
        arena.take(a);
        arena.get(a);
    }

    #[test]
    fn clear_drops_everything() {
        let mut arena = Arena::new();
        for i in 0..10 {
            arena.alloc(i);
        }
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.alloc(42), NodeId::from_index(0));
    }
}
