//! Circular delay line shared by the IIR filter structures.
//!
//! The delay line stores the internal "pole" signal of a transposed
//! direct-form filter. Reads are addressed relative to the write cursor, so
//! several structures can tap the same history without moving it.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Fixed-length circular buffer with relative addressing.
///
/// # Invariants
///
/// - `cursor` always points at the oldest live sample, which is the slot the
///   next [`insert`](Self::insert) overwrites.
/// - `read(i)` returns the value written `i` inserts ago; `read(1)` is the
///   most recent sample. Offsets wrap modulo the buffer length, so negative
///   offsets address the future side of the ring (time advance).
/// - The buffer never reallocates after construction.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f64>,
    cursor: usize,
}

impl DelayLine {
    /// Creates a zero-filled delay line holding `len` samples.
    ///
    /// A zero-length line is valid; it is never read and ignores inserts.
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
            cursor: 0,
        }
    }

    /// Number of samples the line holds.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` for a zero-length line.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Current cursor position (index of the oldest sample).
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reads the sample written `offset` inserts ago.
    ///
    /// Positive offsets are delays, negative offsets are advances.
    ///
    /// # Panics
    ///
    /// Panics if the line is empty.
    #[inline]
    pub fn read(&self, offset: isize) -> f64 {
        let len = self.buffer.len() as isize;
        let idx = (self.cursor as isize - offset).rem_euclid(len) as usize;
        self.buffer[idx]
    }

    /// Overwrites the oldest sample and advances the cursor.
    #[inline]
    pub fn insert(&mut self, value: f64) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer[self.cursor] = value;
        self.cursor += 1;
        if self.cursor == self.buffer.len() {
            self.cursor = 0;
        }
    }

    /// Zeroes the contents and rewinds the cursor. Does not reallocate.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
    }
}
