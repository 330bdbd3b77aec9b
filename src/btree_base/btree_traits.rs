use std::cmp::Ordering;
use std::fmt;

use crate::error::{BTreeSetError, Result};

pub const DEFAULT_ORDER: usize = 6;
pub const MIN_ORDER: usize = 3;

// Traits bound
pub trait KeyComparator<T> {
    /// `None` means the two keys have no defined order.
    fn compare(&self, lhs: &T, rhs: &T) -> Option<Ordering>;
}

/// Wraps a caller supplied comparison function. It takes priority over the
/// natural order of `T`.
#[derive(Clone)]
pub struct FnComparator<F> {
    f: F,
}

impl<F> FnComparator<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F> KeyComparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Option<Ordering> {
        Some((self.f)(lhs, rhs))
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

/// Runtime tree parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BTreeConfig {
    /// Maximum number of children per node, so a node holds at most `order - 1` keys.
    pub order: usize,
    /// Run `verify` after every mutation in debug builds.
    pub self_verify: bool,
}

impl Default for BTreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            self_verify: false,
        }
    }
}

impl BTreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn self_verify(mut self, self_verify: bool) -> Self {
        self.self_verify = self_verify;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(BTreeSetError::InvalidArgument("order must be at least 3"));
        }
        Ok(())
    }

    #[inline]
    pub fn slot_max(&self) -> usize {
        self.order - 1
    }

    #[inline]
    pub fn slot_min(&self) -> usize {
        (self.order - 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btree_config() {
        let config = BTreeConfig::default();
        assert_eq!(config.order, 6);
        assert_eq!(config.slot_max(), 5);
        assert_eq!(config.slot_min(), 2);

        let config = BTreeConfig::new().order(4);
        assert_eq!(config.slot_min(), 1);
        assert_eq!(config.slot_max(), 3);

        let config = BTreeConfig::new().order(3);
        assert_eq!(config.slot_min(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_small_orders() {
        for order in 0..MIN_ORDER {
            assert!(matches!(
                BTreeConfig::new().order(order).validate(),
                Err(BTreeSetError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn fn_comparator_is_total() {
        let cmp = FnComparator::new(|a: &i32, b: &i32| b.cmp(a));
        assert_eq!(cmp.compare(&1, &2), Some(Ordering::Greater));
        assert_eq!(cmp.compare(&2, &2), Some(Ordering::Equal));
    }
}
