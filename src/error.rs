//! Error types for buffer operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// A specialized [`Result`](std::result::Result) for buffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while creating, growing or accessing a [`Buffer`](crate::Buffer).
///
/// The variants fall into two groups: allocation failures, where storage could not be obtained
/// or grown, and contract violations, where the caller asked for something the buffer's
/// invariants forbid. Use [`is_allocation`](Self::is_allocation) and
/// [`is_contract_violation`](Self::is_contract_violation) to tell them apart.
///
/// Every operation returning an error leaves the buffer exactly as it was before the call.
#[derive(Debug, Error)]
pub enum Error {
    /// The allocator could not provide the requested storage.
    #[error("failed to allocate {requested} bytes: {source}")]
    Allocation {
        /// The capacity that was being allocated.
        requested: usize,
        /// The underlying reservation failure.
        #[source]
        source: TryReserveError,
    },

    /// Computing the required capacity overflowed `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The requested capacity is larger than the buffer's configured maximum.
    #[error("requested capacity {requested} exceeds the maximum of {max}")]
    CapacityExceeded {
        /// The minimum capacity that was requested.
        requested: usize,
        /// The configured maximum capacity.
        max: usize,
    },

    /// An index was outside of the valid range for the buffer.
    #[error("index {index} out of bounds for buffer of size {size}")]
    IndexOutOfBounds {
        /// The offending index.
        index: isize,
        /// The size of the buffer at the time of access.
        size: usize,
    },

    /// The buffer has been destroyed and was not reconstructed.
    #[error("buffer has been destroyed")]
    Destroyed,

    /// The content contains a zero byte before the terminator.
    #[error("interior nul byte at position {position}")]
    InteriorNul {
        /// Offset of the first zero byte in the content.
        position: usize,
    },
}

impl Error {
    /// Returns `true` if storage could not be obtained or grown.
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Self::Allocation { .. } | Self::CapacityOverflow | Self::CapacityExceeded { .. }
        )
    }

    /// Returns `true` if the caller broke the buffer's usage contract.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_allocation()
    }
}
