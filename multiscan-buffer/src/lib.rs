//! # multiscan-buffer
//!
//! A fixed-capacity circular byte FIFO with wrap-around read/write/peek.
//!
//! Grounded on the circular layout of `vakthund-core::event_bus::EventBus`
//! (head/tail counters modulo a power-of-two mask) but simplified to the
//! spec's single-threaded byte-oriented contract: no atomics, no SPSC
//! handshake, a `Vec<u8>` backing store instead of a slice of `UnsafeCell`s,
//! and a plain `read_pos`/`write_pos`/`size` triple rather than ever-growing
//! head/tail counters, since bytes (not typed events) need wrap splitting.

use thiserror::Error;
use tracing::trace;

/// Default capacity used when `RingBuffer::new` is called with `0`.
pub const DEFAULT_CAPACITY: usize = 8192;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("requested capacity {0} would overflow memory limits")]
    AllocationFailed(usize),
}

/// Fixed-capacity circular FIFO of bytes.
///
/// Invariant maintained at every method boundary: `0 <= read_pos, write_pos <
/// capacity`, `0 <= size <= capacity`, and `(write_pos - read_pos).rem_euclid(capacity)
/// == size` whenever `size < capacity` (when `size == capacity`, `write_pos ==
/// read_pos`, the degenerate wrap-around case where the two positions
/// coincide but the buffer is full rather than empty).
pub struct RingBuffer {
    data: Vec<u8>,
    capacity: usize,
    size: usize,
    read_pos: usize,
    write_pos: usize,
}

impl RingBuffer {
    /// Allocates a zero-filled buffer. `capacity == 0` substitutes
    /// [`DEFAULT_CAPACITY`] per spec.md §4.1.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            data: vec![0u8; capacity],
            capacity,
            size: 0,
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Re-initializes the buffer in place, discarding any unread data and
    /// freeing the prior backing store by replacing it outright.
    pub fn initialize(&mut self, capacity: usize) {
        *self = Self::new(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available_data(&self) -> usize {
        self.size
    }

    pub fn available_space(&self) -> usize {
        self.capacity - self.size
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Writes up to `available_space()` bytes; the rest is left for the
    /// caller to retry. Returns the number of bytes actually written. Never
    /// overwrites unread data.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let to_write = data.len().min(self.available_space());
        if to_write == 0 {
            return 0;
        }

        let first_chunk = (self.capacity - self.write_pos).min(to_write);
        self.data[self.write_pos..self.write_pos + first_chunk]
            .copy_from_slice(&data[..first_chunk]);

        let remaining = to_write - first_chunk;
        if remaining > 0 {
            self.data[..remaining].copy_from_slice(&data[first_chunk..to_write]);
        }

        self.write_pos = (self.write_pos + to_write) % self.capacity;
        self.size += to_write;
        trace!(to_write, size = self.size, "ring buffer write");
        to_write
    }

    /// Grows the buffer to `new_capacity`, preserving all currently buffered
    /// bytes in FIFO order. No-op if `new_capacity <= capacity`. This is the
    /// strategy `Matcher::feed` uses to guarantee no byte is ever dropped
    /// when a chunk exceeds available space (spec.md §4.4 step 2).
    ///
    /// Fails rather than aborting the process if `new_capacity` cannot
    /// plausibly be allocated (spec.md §7's `AllocationError`).
    pub fn grow_to(&mut self, new_capacity: usize) -> Result<(), BufferError> {
        if new_capacity <= self.capacity {
            return Ok(());
        }
        if new_capacity > isize::MAX as usize / 2 {
            return Err(BufferError::AllocationFailed(new_capacity));
        }
        let retained = self.peek(0);
        let mut grown = Self::new(new_capacity);
        grown.write(&retained);
        *self = grown;
        Ok(())
    }

    /// Consumes and returns up to `min(n, available_data())` bytes. `n == 0`
    /// means "all available data". Advances `read_pos`.
    pub fn read(&mut self, n: usize) -> Vec<u8> {
        let out = self.peek(n);
        self.read_pos = (self.read_pos + out.len()) % self.capacity.max(1);
        self.size -= out.len();
        out
    }

    /// Identical to [`RingBuffer::read`] but does not advance `read_pos`.
    pub fn peek(&self, n: usize) -> Vec<u8> {
        let to_read = if n == 0 { self.size } else { n.min(self.size) };
        if to_read == 0 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity(to_read);
        let first_chunk = (self.capacity - self.read_pos).min(to_read);
        out.extend_from_slice(&self.data[self.read_pos..self.read_pos + first_chunk]);

        let remaining = to_read - first_chunk;
        if remaining > 0 {
            out.extend_from_slice(&self.data[..remaining]);
        }
        out
    }

    /// Peeks the last `n` bytes of the buffered data without consuming
    /// anything, used by the matcher to retain a trailing tail across
    /// `feed` calls.
    pub fn peek_tail(&self, n: usize) -> Vec<u8> {
        let n = n.min(self.size);
        if n == 0 {
            return Vec::new();
        }
        let skip = self.size - n;
        let start = (self.read_pos + skip) % self.capacity;
        let mut out = Vec::with_capacity(n);
        let first_chunk = (self.capacity - start).min(n);
        out.extend_from_slice(&self.data[start..start + first_chunk]);
        let remaining = n - first_chunk;
        if remaining > 0 {
            out.extend_from_slice(&self.data[..remaining]);
        }
        out
    }

    /// Resets `size`, `read_pos`, and `write_pos` to zero. Zeroing the
    /// backing store is not required for correctness but is done here for
    /// deterministic test fixtures (spec.md §4.1).
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0);
        self.size = 0;
        self.read_pos = 0;
        self.write_pos = 0;
    }
}
