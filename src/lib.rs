//! An ordered set backed by an in-memory B-tree.
//!
//! Nodes live in an arena and keep a link to their parent. Insertion splits
//! overflowing nodes and promotes their median. Deletion refills short nodes
//! by stealing from a sibling or merging with one, cascading up to the root.
//! Iteration walks the tree in order with an explicit stack of child indices.
//!
//! ```
//! use ordered_btree_set::BTreeSet;
//!
//! let mut set: BTreeSet<i32> = BTreeSet::with_order(4)?;
//! for x in [30, 10, 20] {
//!     set.add(x)?;
//! }
//! assert!(set.contains(&20));
//! assert!(set.remove(&10));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![20, 30]);
//! # Ok::<(), ordered_btree_set::BTreeSetError>(())
//! ```

pub mod btree_base;
pub mod btree_set;
pub mod error;

pub use btree_base::{
    btree_traits::{BTreeConfig, FnComparator, KeyComparator, DEFAULT_ORDER, MIN_ORDER},
    iter::{Cursor, Iter},
    tree_stats::TreeStats,
    NaturalOrder,
};
pub use btree_set::BTreeSet;
pub use error::{BTreeSetError, Result, VerifyError};
