use bitmask_enum::bitmask;

#[bitmask(u8)]
pub enum DeletionResultFlags {
    Ok = 0,
    NotFound = 1,
    StoleLeft = 2,
    StoleRight = 4,
    MergedLeft = 8,
    MergedRight = 16,
    RootShrunk = 32,
}

/// Outcome of a single deletion: what rebalancing happened and the element
/// that left the tree.
pub struct DeletionResult<T> {
    pub flags: DeletionResultFlags,
    pub removed: Option<T>,
}

impl<T> DeletionResult<T> {
    pub fn not_found() -> Self {
        Self {
            flags: DeletionResultFlags::NotFound,
            removed: None,
        }
    }

    pub fn removed(flags: DeletionResultFlags, removed: T) -> Self {
        Self {
            flags,
            removed: Some(removed),
        }
    }

    pub fn has(&self, flag: DeletionResultFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn found(&self) -> bool {
        !self.has(DeletionResultFlags::NotFound)
    }
}

#[cfg(test)]
#[test]
fn flags_accumulate() {
    let mut result = DeletionResult::removed(DeletionResultFlags::Ok, 7);
    assert!(result.found());
    assert!(!result.has(DeletionResultFlags::MergedRight));

    result.flags = result.flags | DeletionResultFlags::MergedRight;
    result.flags = result.flags | DeletionResultFlags::StoleLeft;
    assert!(result.has(DeletionResultFlags::MergedRight));
    assert!(result.has(DeletionResultFlags::StoleLeft));
    assert!(!result.has(DeletionResultFlags::RootShrunk));

    let missing = DeletionResult::<i32>::not_found();
    assert!(!missing.found());
    assert!(missing.removed.is_none());
}
