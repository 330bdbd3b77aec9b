/// Node and rebalancing counters maintained by the tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub size: usize,
    pub leaves: usize,
    pub inner_nodes: usize,
    pub splits: usize,
    pub steals: usize,
    pub merges: usize,
    slot_max: usize,
}

impl TreeStats {
    pub fn new(slot_max: usize) -> Self {
        Self {
            slot_max,
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> usize {
        self.inner_nodes + self.leaves
    }

    /// Share of key slots in use across all nodes.
    pub fn avgfill(&self) -> f64 {
        self.size as f64 / (self.nodes() * self.slot_max) as f64
    }
}

#[cfg(test)]
#[test]
fn avgfill_counts_all_nodes() {
    let mut stats = TreeStats::new(5);
    stats.leaves = 3;
    stats.inner_nodes = 1;
    stats.size = 10;
    assert_eq!(stats.nodes(), 4);
    assert!((stats.avgfill() - 0.5).abs() < f64::EPSILON);
}
