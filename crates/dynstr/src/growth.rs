//! Storage sizing and allocation.
//!
//! Appends and insert/replace edits grow storage differently and the two
//! policies are kept apart on purpose: [`Growth::Doubling`] serves the hot
//! single-byte append path, [`Growth::ExactFit`] serves bulk edits where a
//! minimal footprint matters more than amortization.

use alloc::vec::Vec;
use core::{fmt, ops::Range};

use crate::BufferError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Growth {
    /// Double the capacity until the content and terminator fit.
    Doubling,
    /// Allocate exactly `required_len + 1` bytes.
    ExactFit,
}

impl Growth {
    /// Capacity to allocate so that `required_len` content bytes plus the
    /// terminator fit, starting from `current`.
    pub(crate) fn target_capacity(
        self,
        current: usize,
        required_len: usize,
    ) -> Result<usize, BufferError> {
        let needed = required_len
            .checked_add(1)
            .ok_or(BufferError::CapacityOverflow)?;
        match self {
            Growth::ExactFit => Ok(needed),
            Growth::Doubling => {
                let mut capacity = current.max(1);
                while capacity < needed {
                    capacity = capacity
                        .checked_mul(2)
                        .ok_or(BufferError::CapacityOverflow)?;
                }
                Ok(capacity)
            }
        }
    }
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Growth::Doubling => f.write_str("doubling"),
            Growth::ExactFit => f.write_str("exact-fit"),
        }
    }
}

/// Describes how an edit reshapes the content when it is copied into a new
/// block: bytes before `position` stay put, `removed` bytes at `position` are
/// dropped, and the tail moves so that it starts `inserted` bytes after
/// `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Gap {
    pub(crate) position: usize,
    pub(crate) removed: usize,
    pub(crate) inserted: usize,
}

impl Gap {
    /// An empty gap at the end of the content; a plain copy.
    pub(crate) fn at_end(len: usize) -> Self {
        Self {
            position: len,
            removed: 0,
            inserted: 0,
        }
    }

    /// Old location of the bytes that follow the edited range.
    pub(crate) fn tail(self, len: usize) -> Range<usize> {
        self.position + self.removed..len
    }

    /// New start of the bytes that follow the edited range.
    pub(crate) fn tail_start(self) -> usize {
        self.position + self.inserted
    }

    /// Content length once the edit is applied.
    ///
    /// `removed` must already be known to fit inside `len`.
    pub(crate) fn new_len(self, len: usize) -> Result<usize, BufferError> {
        (len - self.removed)
            .checked_add(self.inserted)
            .ok_or(BufferError::CapacityOverflow)
    }
}

/// Allocates a zero-filled storage block of exactly `capacity` bytes.
pub(crate) fn allocate(capacity: usize) -> Result<Vec<u8>, BufferError> {
    let mut block = Vec::new();
    block
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocationFailed {
            requested: capacity,
        })?;
    block.resize(capacity, 0);
    Ok(block)
}
