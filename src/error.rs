use thiserror::Error;

/// Errors returned by [`BTreeSet`](crate::BTreeSet) and its cursor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BTreeSetError {
    /// An argument was missing or out of range (an absent element, or an order below 3).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Two elements could not be compared under their natural order (e.g. a NaN).
    #[error("elements cannot be compared under their natural order")]
    Unorderable,

    /// The cursor is exhausted, or `remove` was called with no element pending.
    #[error("no such element")]
    NoSuchElement,

    /// `next` was called on a cursor after it removed an element.
    #[error("cursor was invalidated by a removal, obtain a new cursor")]
    StaleCursor,
}

pub type Result<T> = std::result::Result<T, BTreeSetError>;

/// A structural invariant that `verify` found broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("node at depth {depth} holds {len} keys, outside {min}..={max}")]
    Fill {
        depth: usize,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("keys at depth {depth} are not strictly ascending or escape their separators")]
    Order { depth: usize },

    #[error("inner node at depth {depth} has {children} children for {keys} keys")]
    ChildCount {
        depth: usize,
        keys: usize,
        children: usize,
    },

    #[error("leaves found at depth {found}, expected {expected}")]
    UnevenLeaves { expected: usize, found: usize },

    #[error("child at depth {depth} does not link back to its parent")]
    ParentLink { depth: usize },

    #[error("{counted} nodes accounted for but {live} allocated")]
    NodeCount { counted: usize, live: usize },

    #[error("size counter is {counted} but {reachable} keys are reachable")]
    Size { counted: usize, reachable: usize },
}
