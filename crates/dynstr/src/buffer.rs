use alloc::{vec, vec::Vec};
use core::ffi::CStr;

use bstr::BStr;
use log::{debug, trace};

use crate::{
    BufferError,
    growth::{self, Gap, Growth},
};

const LOG_TARGET: &str = "dynstr::buffer";

/// A growable byte string whose content is always followed by a zero byte.
///
/// The storage block holds `capacity()` bytes: `len()` content bytes, the
/// terminator, and unused space. The terminator is not part of the content
/// and is rewritten after every edit, so [`as_bytes_with_nul`] and
/// [`as_c_str`] are always valid.
///
/// Capacity only grows. [`push`], [`reserve`] and [`extend_from_slice`]
/// double it; [`insert_at`] and [`replace_range`] grow it to exactly the new
/// length plus one byte.
///
/// [`as_bytes_with_nul`]: Buffer::as_bytes_with_nul
/// [`as_c_str`]: Buffer::as_c_str
/// [`push`]: Buffer::push
/// [`reserve`]: Buffer::reserve
/// [`extend_from_slice`]: Buffer::extend_from_slice
/// [`insert_at`]: Buffer::insert_at
/// [`replace_range`]: Buffer::replace_range
#[derive(Clone)]
pub struct Buffer {
    /// `storage.len()` is the logical capacity.
    storage: Vec<u8>,
    len: usize,
}

impl Buffer {
    /// Creates an empty buffer holding only the terminator.
    ///
    /// ```rust
    /// let s = dynstr::Buffer::new();
    /// assert_eq!(s.len(), 0);
    /// assert_eq!(s.capacity(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: vec![0],
            len: 0,
        }
    }

    /// Creates a buffer from optional initial content.
    ///
    /// `None` behaves like [`Buffer::new`]. The bytes are copied as-is, zero
    /// bytes included.
    #[must_use]
    pub fn from_bytes(initial: Option<&[u8]>) -> Self {
        initial.map_or_else(Self::new, Self::from)
    }

    /// Creates a buffer holding a copy of `initial`, reporting allocation
    /// failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] if the storage block cannot
    /// be allocated.
    pub fn try_from_bytes(initial: &[u8]) -> Result<Self, BufferError> {
        let capacity = initial
            .len()
            .checked_add(1)
            .ok_or(BufferError::CapacityOverflow)?;
        let mut storage = growth::allocate(capacity)?;
        storage[..initial.len()].copy_from_slice(initial);
        Ok(Self {
            storage,
            len: initial.len(),
        })
    }

    /// Creates a buffer from the bytes of `s` before its terminator.
    #[must_use]
    pub fn from_c_str(s: &CStr) -> Self {
        Self::from(s.to_bytes())
    }

    /// Creates an empty buffer with room for at least `capacity` bytes,
    /// terminator included.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity.max(1)],
            len: 0,
        }
    }

    /// Adopts a block whose byte at `len` is already the terminator.
    pub(crate) fn from_storage(storage: Vec<u8>, len: usize) -> Self {
        debug_assert_eq!(storage.get(len), Some(&0));
        Self { storage, len }
    }

    /// Number of content bytes, not counting the terminator.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the storage block in bytes, terminator slot included.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The content bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The content bytes, writable in place.
    ///
    /// The terminator sits outside the returned slice.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.storage[..self.len]
    }

    /// The content bytes followed by the terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.storage[..=self.len]
    }

    /// Terminator-delimited view of the storage.
    ///
    /// If the content contains a zero byte the view ends there, the way any
    /// terminator-delimited consumer would read it.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr {
        debug_assert_eq!(self.storage[self.len], 0);
        CStr::from_bytes_until_nul(self.as_bytes_with_nul()).unwrap_or_default()
    }

    /// The content as a [`BStr`], for display and debugging.
    #[inline]
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        BStr::new(self.as_bytes())
    }

    /// Address of the storage block.
    ///
    /// The pointer addresses `len() + 1` readable bytes ending in the
    /// terminator. Any call that takes `&mut self` may move the block.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.storage.as_ptr()
    }

    /// Mutable address of the storage block.
    ///
    /// Writers must stay within the first `len()` bytes and leave the
    /// terminator alone. Any call that takes `&mut self` may move the block.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.storage.as_mut_ptr()
    }

    /// Appends one byte, doubling the capacity when the block is full.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] or
    /// [`BufferError::CapacityOverflow`] if the block cannot grow. The buffer
    /// is unchanged in that case.
    pub fn push(&mut self, byte: u8) -> Result<(), BufferError> {
        if !self.has_space() {
            self.grow_to_fit(self.len + 1)?;
        }
        self.storage[self.len] = byte;
        self.len += 1;
        self.storage[self.len] = 0;
        Ok(())
    }

    /// Removes and returns the last content byte.
    pub fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let byte = self.storage[self.len];
        self.storage[self.len] = 0;
        Some(byte)
    }

    /// Appends `bytes`, doubling the capacity as many times as needed.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] or
    /// [`BufferError::CapacityOverflow`] if the block cannot grow. The buffer
    /// is unchanged in that case.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.reserve(bytes.len())?;
        let end = self.len + bytes.len();
        self.storage[self.len..end].copy_from_slice(bytes);
        self.len = end;
        self.storage[end] = 0;
        Ok(())
    }

    /// Makes room for at least `additional` more content bytes using the
    /// doubling policy. Does nothing if they already fit.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] or
    /// [`BufferError::CapacityOverflow`] if the block cannot grow.
    pub fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(BufferError::CapacityOverflow)?;
        self.grow_to_fit(required)
    }

    /// Removes `count` bytes starting at `position`, shifting the tail left.
    ///
    /// Never reallocates.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidRange`] if `position + count > len()`.
    pub fn remove_range(&mut self, position: usize, count: usize) -> Result<(), BufferError> {
        self.check_range(position, count)?;
        self.storage.copy_within(position + count..self.len, position);
        self.len -= count;
        self.storage[self.len] = 0;
        Ok(())
    }

    /// Inserts `content` before the byte at `position`.
    ///
    /// `position == len()` appends. When the block is too small it is
    /// replaced by one of exactly `len() + content.len() + 1` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidRange`] if `position > len()`, or an
    /// allocation error if the block cannot grow. The buffer is unchanged
    /// on error.
    pub fn insert_at(&mut self, position: usize, content: &[u8]) -> Result<(), BufferError> {
        self.splice(position, 0, content)
    }

    /// Replaces the `count` bytes at `position` with `content`.
    ///
    /// When the block is too small it is replaced by one of exactly
    /// `len() - count + content.len() + 1` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidRange`] if `position + count > len()`,
    /// or an allocation error if the block cannot grow. The buffer is
    /// unchanged on error.
    pub fn replace_range(
        &mut self,
        position: usize,
        count: usize,
        content: &[u8],
    ) -> Result<(), BufferError> {
        self.splice(position, count, content)
    }

    /// Drops all content. Capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shortens the content to `len` bytes. Does nothing if the content is
    /// already that short. Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
            self.storage[len] = 0;
        }
    }

    /// Consumes the buffer and returns its content bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        let mut storage = self.storage;
        storage.truncate(self.len);
        storage
    }

    /// Checks the storage invariants: at least one byte of capacity, room for
    /// the terminator, and a zero byte right after the content.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    #[must_use]
    pub fn check_invariants(&self) -> bool {
        self.capacity() >= 1 && self.len < self.capacity() && self.storage[self.len] == 0
    }

    fn has_space(&self) -> bool {
        self.capacity() > self.len + 1
    }

    fn check_range(&self, position: usize, count: usize) -> Result<(), BufferError> {
        match position.checked_add(count) {
            Some(end) if end <= self.len => Ok(()),
            _ => {
                debug!(
                    target: LOG_TARGET,
                    "rejected range {position}+{count} for length {}", self.len
                );
                Err(BufferError::InvalidRange {
                    position,
                    count,
                    length: self.len,
                })
            }
        }
    }

    /// Shared body of `insert_at` and `replace_range`.
    fn splice(&mut self, position: usize, count: usize, content: &[u8]) -> Result<(), BufferError> {
        self.check_range(position, count)?;
        let gap = Gap {
            position,
            removed: count,
            inserted: content.len(),
        };
        let new_len = gap.new_len(self.len)?;

        if new_len >= self.capacity() {
            self.reallocate(Growth::ExactFit, new_len, gap)?;
        } else {
            self.storage.copy_within(gap.tail(self.len), gap.tail_start());
        }

        self.storage[position..gap.tail_start()].copy_from_slice(content);
        self.len = new_len;
        self.storage[new_len] = 0;
        Ok(())
    }

    /// Doubles the capacity until `required_len` content bytes and the
    /// terminator fit.
    fn grow_to_fit(&mut self, required_len: usize) -> Result<(), BufferError> {
        if required_len < self.capacity() {
            return Ok(());
        }
        self.reallocate(Growth::Doubling, required_len, Gap::at_end(self.len))
    }

    /// Moves the content into a new block sized by `growth`, laid out
    /// according to `gap`. Bytes inside the gap are left zeroed for the
    /// caller to fill; `len` is not updated.
    fn reallocate(&mut self, growth: Growth, required_len: usize, gap: Gap) -> Result<(), BufferError> {
        let old_capacity = self.capacity();
        let capacity = growth.target_capacity(old_capacity, required_len)?;
        let mut block = growth::allocate(capacity)?;

        block[..gap.position].copy_from_slice(&self.storage[..gap.position]);
        let tail = gap.tail(self.len);
        let tail_start = gap.tail_start();
        block[tail_start..tail_start + tail.len()].copy_from_slice(&self.storage[tail]);

        trace!(
            target: LOG_TARGET,
            "{growth} reallocation {old_capacity} -> {capacity} bytes for length {required_len}"
        );
        self.storage = block;
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacities_after_pushes(n: usize) -> Vec<usize> {
        let mut s = Buffer::new();
        let mut seen = vec![s.capacity()];
        for i in 0..n {
            s.push(b'a' + (i % 26) as u8).unwrap();
            if seen.last() != Some(&s.capacity()) {
                seen.push(s.capacity());
            }
        }
        seen
    }

    #[test]
    fn empty_buffer_holds_only_the_terminator() {
        let s = Buffer::new();
        assert_eq!(s.len(), 0);
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 1);
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert!(s.check_invariants());
    }

    #[test]
    fn create_sizes_storage_to_content() {
        let s = Buffer::from(&b"hello"[..]);
        assert_eq!(s.len(), 5);
        assert_eq!(s.capacity(), 6);
        assert_eq!(s.as_bytes_with_nul(), b"hello\0");

        let s = Buffer::try_from_bytes(b"abc").unwrap();
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.as_bytes(), b"abc");

        let s = Buffer::from_bytes(None);
        assert_eq!(s.capacity(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn push_doubles_capacity() {
        assert_eq!(capacities_after_pushes(9), vec![1, 2, 4, 8, 16]);
        assert_eq!(capacities_after_pushes(7), vec![1, 2, 4, 8]);
        assert_eq!(capacities_after_pushes(0), vec![1]);
    }

    #[test]
    fn push_grows_odd_capacity_by_doubling() {
        let mut s = Buffer::from(&b"ab"[..]);
        assert_eq!(s.capacity(), 3);
        s.push(b'c').unwrap();
        assert_eq!(s.capacity(), 6);
        assert_eq!(s.as_bytes_with_nul(), b"abc\0");
    }

    #[test]
    fn insert_grows_to_exact_fit() {
        let mut s = Buffer::from(&b"ad"[..]);
        s.insert_at(1, b"bc").unwrap();
        assert_eq!(s.as_bytes(), b"abcd");
        assert_eq!(s.capacity(), 5);
    }

    #[test]
    fn insert_in_place_when_room_remains() {
        let mut s = Buffer::with_capacity(16);
        s.extend_from_slice(b"held").unwrap();
        let ptr = s.as_ptr();
        s.insert_at(2, b"llo wor").unwrap();
        assert_eq!(s.as_bytes(), b"hello world");
        assert_eq!(s.capacity(), 16);
        assert_eq!(s.as_ptr(), ptr);
        assert!(s.check_invariants());
    }

    #[test]
    fn insert_that_exactly_fills_the_block_stays_in_place() {
        let mut s = Buffer::with_capacity(4);
        s.extend_from_slice(b"ab").unwrap();
        s.insert_at(2, b"c").unwrap();
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.as_bytes_with_nul(), b"abc\0");
    }

    #[test]
    fn replace_grows_to_exact_fit() {
        let mut s = Buffer::from(&b"a-b"[..]);
        s.replace_range(1, 1, b" => ").unwrap();
        assert_eq!(s.as_bytes(), b"a => b");
        assert_eq!(s.capacity(), 7);
    }

    #[test]
    fn replace_shrinking_keeps_capacity() {
        let mut s = Buffer::from(&b"one, two, three"[..]);
        s.replace_range(3, 7, b";").unwrap();
        assert_eq!(s.as_bytes(), b"one;three");
        assert_eq!(s.capacity(), 16);
        assert_eq!(s.as_bytes_with_nul(), b"one;three\0");
    }

    #[test]
    fn replace_same_length_overwrites() {
        let mut s = Buffer::from(&b"cat"[..]);
        s.replace_range(0, 1, b"b").unwrap();
        assert_eq!(s.as_bytes(), b"bat");
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn remove_shifts_only_the_tail() {
        let mut s = Buffer::from(&b"abcdef"[..]);
        s.remove_range(1, 2).unwrap();
        assert_eq!(s.as_bytes_with_nul(), b"adef\0");
        s.remove_range(2, 2).unwrap();
        assert_eq!(s.as_bytes_with_nul(), b"ad\0");
        s.remove_range(0, 2).unwrap();
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert_eq!(s.capacity(), 7);
    }

    #[test]
    fn out_of_range_edits_leave_buffer_untouched() {
        let mut s = Buffer::from(&b"abc"[..]);
        let before = s.clone();

        assert_eq!(
            s.remove_range(2, 2),
            Err(BufferError::InvalidRange {
                position: 2,
                count: 2,
                length: 3
            })
        );
        assert_eq!(
            s.insert_at(4, b"x"),
            Err(BufferError::InvalidRange {
                position: 4,
                count: 0,
                length: 3
            })
        );
        assert_eq!(
            s.replace_range(usize::MAX, 2, b"x"),
            Err(BufferError::InvalidRange {
                position: usize::MAX,
                count: 2,
                length: 3
            })
        );

        assert_eq!(s, before);
        assert_eq!(s.capacity(), before.capacity());
        assert!(s.check_invariants());
    }

    #[test]
    fn reserve_uses_doubling() {
        let mut s = Buffer::from(&b"abc"[..]);
        s.reserve(1).unwrap();
        assert_eq!(s.capacity(), 8);
        s.reserve(4).unwrap();
        assert_eq!(s.capacity(), 8);
        s.reserve(5).unwrap();
        assert_eq!(s.capacity(), 16);
        assert_eq!(s.reserve(usize::MAX), Err(BufferError::CapacityOverflow));
        assert_eq!(s.as_bytes(), b"abc");
    }

    #[test]
    fn pop_truncate_and_clear_keep_capacity() {
        let mut s = Buffer::from(&b"abcdef"[..]);
        assert_eq!(s.pop(), Some(b'f'));
        assert_eq!(s.as_bytes_with_nul(), b"abcde\0");
        s.truncate(10);
        assert_eq!(s.len(), 5);
        s.truncate(2);
        assert_eq!(s.as_bytes_with_nul(), b"ab\0");
        s.clear();
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert_eq!(s.pop(), None);
        assert_eq!(s.capacity(), 7);
    }

    #[test]
    fn c_str_view_stops_at_interior_zero() {
        let mut s = Buffer::from(&b"ab"[..]);
        assert_eq!(s.as_c_str().to_bytes(), b"ab");
        s.push(0).unwrap();
        s.push(b'c').unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.as_c_str().to_bytes(), b"ab");
        assert_eq!(s.as_bytes_with_nul(), b"ab\0c\0");
    }

    #[test]
    fn mutable_view_edits_content() {
        let mut s = Buffer::from(&b"abc"[..]);
        s.as_bytes_mut().make_ascii_uppercase();
        assert_eq!(s.as_bytes_with_nul(), b"ABC\0");
    }

    #[test]
    fn into_vec_returns_content_only() {
        let mut s = Buffer::new();
        s.extend_from_slice(b"xyz").unwrap();
        assert_eq!(s.into_vec(), b"xyz".to_vec());
    }
}
