use std::result::Result as StdResult;

use thiserror::Error;

use crate::id::ViewId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The view id does not resolve to a live view.
    #[error("view {0:?} not found")]
    ViewNotFound(ViewId),

    /// Adding another child would pass the parent's declared limit.
    #[error("child capacity {limit} exceeded on {parent:?}")]
    CapacityExceeded {
        /// The parent whose limit would be passed.
        parent: ViewId,
        /// The declared child limit.
        limit: usize,
    },

    /// The attachment would make a view its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCycle {
        /// The prospective parent.
        parent: ViewId,
        /// The child being attached.
        child: ViewId,
    },

    /// The root view cannot be re-parented or removed.
    #[error("the root view cannot be moved or removed")]
    RootImmutable,
}
