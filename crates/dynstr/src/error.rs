use thiserror::Error;

/// Errors returned by fallible [`Buffer`](crate::Buffer) operations.
///
/// A failed operation never leaves a partial edit behind: the buffer keeps the
/// content and capacity it had before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// `position + count` reaches past the end of the content.
    #[error("range {position}+{count} is out of bounds for length {length}")]
    InvalidRange {
        /// First byte of the requested range.
        position: usize,
        /// Number of bytes in the requested range (0 for insertions).
        count: usize,
        /// Content length at the time of the call.
        length: usize,
    },
    /// Computing the new storage size overflowed `usize`.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator could not provide a block of the requested size.
    #[error("failed to allocate {requested} bytes")]
    AllocationFailed {
        /// Size of the storage block that was requested.
        requested: usize,
    },
}
