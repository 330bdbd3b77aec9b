pub mod arena;
pub mod btree;
pub mod btree_traits;
pub mod deletion;
pub mod iter;
mod node;
pub mod tree_stats;

use self::btree_traits::KeyComparator;
use std::cmp::Ordering;

/// Compares keys with their `PartialOrd` implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T> KeyComparator<T> for NaturalOrder
where
    T: PartialOrd,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Option<Ordering> {
        lhs.partial_cmp(rhs)
    }
}

#[cfg(test)]
#[test]
fn natural_order_reports_incomparable_keys() {
    assert_eq!(NaturalOrder.compare(&1.0, &2.0), Some(Ordering::Less));
    assert_eq!(NaturalOrder.compare(&f64::NAN, &2.0), None);
}
