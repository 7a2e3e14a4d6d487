//! The accumulation buffer that gathers chunks between writes.

use std::mem;

use bytes::Bytes;

use super::BufferPool;

/// Outcome of appending a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Append {
    /// The chunk was copied in and there is still room.
    Buffered,
    /// The buffer is full; any unfit suffix is held as the leftover.
    Full,
}

/// The regions one flush has to write, in order.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WritePlan<'a> {
    Scalar(&'a [u8]),
    Vectored([&'a [u8]; 2]),
}

impl WritePlan<'_> {
    /// Total number of bytes covered by the plan.
    pub(crate) fn len(&self) -> usize {
        match self {
            WritePlan::Scalar(bytes) => bytes.len(),
            WritePlan::Vectored(pieces) => pieces.iter().map(|p| p.len()).sum(),
        }
    }
}

/// Gathers consecutive chunks so they can be written with a single write.
///
/// The filled region is `storage` (bytes copied from small chunks) followed
/// by `tail`, a zero-copy prefix of the chunk that filled the buffer. The
/// rest of that chunk is the `leftover`, which has to be appended again
/// before any new chunk. `filled <= capacity` holds at all times.
#[derive(Debug)]
pub(crate) struct AccumulationBuffer {
    storage: Vec<u8>,
    capacity: usize,
    tail: Option<Bytes>,
    leftover: Option<Bytes>,
    pool: Option<BufferPool>,
}

impl AccumulationBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            tail: None,
            leftover: None,
            pool: None,
        }
    }

    /// Creates a buffer whose storage is checked out of `pool` and returned on drop.
    pub(crate) fn from_pool(pool: &BufferPool, capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            storage: pool.checkout(capacity),
            capacity,
            tail: None,
            leftover: None,
            pool: Some(pool.clone()),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes waiting to be written (not counting the leftover).
    pub(crate) fn filled(&self) -> usize {
        self.storage.len() + self.tail.as_ref().map_or(0, Bytes::len)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    pub(crate) fn has_leftover(&self) -> bool {
        self.leftover.is_some()
    }

    /// Appends a chunk.
    ///
    /// A chunk smaller than the remaining room is copied. Otherwise the part
    /// that fits is kept without copying, the remainder becomes the leftover
    /// and the buffer reports [`Append::Full`].
    pub(crate) fn append(&mut self, mut chunk: Bytes) -> Append {
        debug_assert!(self.leftover.is_none(), "leftover must be consumed first");
        debug_assert!(self.tail.is_none(), "append on a full buffer");

        let room = self.capacity - self.storage.len();
        if chunk.len() < room {
            self.storage.extend_from_slice(&chunk);
            return Append::Buffered;
        }

        let rest = chunk.split_off(room);
        if !chunk.is_empty() {
            self.tail = Some(chunk);
        }
        if !rest.is_empty() {
            self.leftover = Some(rest);
        }
        Append::Full
    }

    /// Takes the unfit suffix carried over from the last overflowing chunk.
    pub(crate) fn take_leftover(&mut self) -> Option<Bytes> {
        self.leftover.take()
    }

    /// Describes the next write, or `None` when nothing is filled.
    pub(crate) fn write_plan(&self) -> Option<WritePlan<'_>> {
        match (self.storage.is_empty(), &self.tail) {
            (true, None) => None,
            (false, None) => Some(WritePlan::Scalar(&self.storage)),
            (true, Some(tail)) => Some(WritePlan::Scalar(tail)),
            (false, Some(tail)) => Some(WritePlan::Vectored([&self.storage, tail])),
        }
    }

    /// Marks the filled region as written. Returns the number of bytes released.
    pub(crate) fn commit(&mut self) -> usize {
        let written = self.filled();
        self.storage.clear();
        self.tail = None;
        written
    }

    /// Drops everything still held, leftover included. Returns the byte count dropped.
    pub(crate) fn discard(&mut self) -> usize {
        let dropped = self.filled() + self.leftover.as_ref().map_or(0, Bytes::len);
        self.storage.clear();
        self.tail = None;
        self.leftover = None;
        dropped
    }
}

impl Drop for AccumulationBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.restore(mem::take(&mut self.storage));
        }
    }
}
