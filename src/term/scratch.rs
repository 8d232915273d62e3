//! Growable scratch buffer used while encoding terms.
//!
//! The buffer owns a zero-filled byte array whose length is the allocated
//! size, plus a logical length cursor. Writers ask for room at an offset with
//! [`ScratchBuffer::ensure_capacity`], write into the returned slice, and
//! then move the cursor with [`ScratchBuffer::set_len`].
//!
//! # Growth and release
//!
//! - Growth: the allocated size becomes the next power of two that is at
//!   least `offset + additional` (and never below the initial capacity).
//! - Release: once the allocation exceeds the release threshold (64 KiB by
//!   default), [`ScratchBuffer::release_if_oversized`] drops it; the next
//!   write allocates a fresh, minimally sized array.
//!
//! A buffer belongs to a single converter and is never shared between
//! concurrent conversions.
//!
//! # Examples
//!
//! ```
//! use termsmith::term::scratch::ScratchBuffer;
//!
//! let mut buffer = ScratchBuffer::new();
//! let room = buffer.ensure_capacity(0, 3);
//! room[..3].copy_from_slice(b"abc");
//! buffer.set_len(3);
//!
//! assert_eq!(buffer.as_bytes(), b"abc");
//! assert_eq!(buffer.capacity(), 128);
//! ```

use crate::util::bits::next_power_of_two;

/// Capacity of the first allocation.
pub const DEFAULT_INITIAL_CAPACITY: usize = 128;

/// Allocations larger than this are dropped after a conversion.
pub const DEFAULT_RELEASE_THRESHOLD: usize = 64 * 1024;

/// An owned, resizable byte array plus a logical length cursor.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
    len: usize,
    initial_capacity: usize,
    release_threshold: usize,
}

impl ScratchBuffer {
    /// Create an empty buffer with the default limits. Nothing is allocated
    /// until the first write.
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_INITIAL_CAPACITY, DEFAULT_RELEASE_THRESHOLD)
    }

    /// Create an empty buffer with explicit limits.
    pub fn with_limits(initial_capacity: usize, release_threshold: usize) -> Self {
        ScratchBuffer {
            bytes: Vec::new(),
            len: 0,
            initial_capacity: next_power_of_two(initial_capacity),
            release_threshold,
        }
    }

    /// Currently allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Logical length of the written content.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no content has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The release threshold of this buffer.
    pub fn release_threshold(&self) -> usize {
        self.release_threshold
    }

    /// Make sure `additional` bytes can be written starting at `offset`.
    ///
    /// Returns the writable region `offset..offset + additional`. Bytes that
    /// were already written before `offset` are preserved across growth.
    pub fn ensure_capacity(&mut self, offset: usize, additional: usize) -> &mut [u8] {
        let required = offset + additional;
        if required > self.bytes.len() {
            let new_size = next_power_of_two(required.max(self.initial_capacity));
            self.bytes.resize(new_size, 0);
        }
        &mut self.bytes[offset..required]
    }

    /// Copy `data` to `offset`, growing as needed. Returns the number of
    /// bytes written. The cursor is not moved.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> usize {
        self.ensure_capacity(offset, data.len()).copy_from_slice(data);
        data.len()
    }

    /// Append one byte at the cursor and advance it.
    pub fn push(&mut self, byte: u8) {
        let at = self.len;
        self.ensure_capacity(at, 1)[0] = byte;
        self.len += 1;
    }

    /// Move the cursor.
    ///
    /// # Panics
    ///
    /// Panics if `len` is beyond the allocated size.
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.bytes.len(),
            "scratch cursor {len} beyond allocated size {}",
            self.bytes.len()
        );
        self.len = len;
    }

    /// The written content, `0..len`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// A region of the allocation, regardless of the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the range is outside the allocated size.
    pub fn region(&self, offset: usize, len: usize) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    /// Reset the cursor, keeping the allocation.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Drop the allocation if it grew past the release threshold.
    ///
    /// Returns `true` when the buffer was released.
    pub fn release_if_oversized(&mut self) -> bool {
        if self.bytes.len() > self.release_threshold {
            self.bytes = Vec::new();
            self.len = 0;
            true
        } else {
            false
        }
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}
