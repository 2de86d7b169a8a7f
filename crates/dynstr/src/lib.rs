//! A growable, zero-terminated byte string with in-place editing.
//!
//! [`Buffer`] owns one contiguous storage block. The content bytes are always
//! followed by a zero terminator so the storage can be handed to consumers
//! that expect terminator-delimited strings, while editing goes through four
//! primitives: [`push`](Buffer::push), [`remove_range`](Buffer::remove_range),
//! [`insert_at`](Buffer::insert_at) and [`replace_range`](Buffer::replace_range).
//!
//! ```rust
//! use dynstr::Buffer;
//!
//! let mut s = Buffer::new();
//! s.push(b'a')?;
//! s.insert_at(0, b"xy")?;
//! s.replace_range(1, 1, b"ZZZ")?;
//! s.remove_range(1, 3)?;
//! assert_eq!(s.as_bytes(), b"xa");
//! assert_eq!(s.as_bytes_with_nul(), b"xa\0");
//! # Ok::<(), dynstr::BufferError>(())
//! ```
//!
//! Growth follows two policies. Appending doubles the capacity so a run of
//! single-byte pushes costs amortized O(1). Insertions and replacements that
//! run out of room allocate exactly `new_len + 1` bytes. Capacity never
//! shrinks.
//!
//! Out-of-range positions are rejected with [`BufferError::InvalidRange`] and
//! the buffer is left untouched.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod error;
mod growth;
#[cfg(feature = "serde")]
mod serde_impls;
mod traits;

#[cfg(test)]
mod tests;

pub use buffer::Buffer;
pub use error::BufferError;
