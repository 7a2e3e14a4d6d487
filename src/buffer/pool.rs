//! Shared buffer pool for reusing accumulation storage across pumps.

use std::sync::Arc;

use parking_lot::Mutex;

/// Maximum number of buffers kept by a pool.
pub const MAX_POOL_SIZE: usize = 4;

/// Buffers larger than this are dropped instead of being returned (1 MiB).
pub const MAX_RETAINED_CAPACITY: usize = 1024 * 1024;

/// A pool of reusable byte buffers with checkout/return semantics.
///
/// Cloning a `BufferPool` yields another handle to the same pool. A buffer
/// checked out by one pump belongs to that pump alone until it is returned.
///
/// # Example
///
/// ```
/// use pumprs::BufferPool;
///
/// let pool = BufferPool::new();
/// let buf = pool.checkout(4096);
/// assert!(buf.capacity() >= 4096);
/// pool.restore(buf);
/// assert_eq!(pool.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BufferPool {
    free: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl BufferPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an empty buffer with at least `capacity` bytes of room.
    pub fn checkout(&self, capacity: usize) -> Vec<u8> {
        let mut free = self.free.lock();
        let found = free.iter().position(|buf| buf.capacity() >= capacity);
        match found {
            Some(index) => free.swap_remove(index),
            None => Vec::with_capacity(capacity),
        }
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer is cleared first. Oversized buffers, and buffers arriving
    /// while the pool is full, are dropped.
    pub fn restore(&self, mut buf: Vec<u8>) {
        if buf.capacity() == 0 || buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_POOL_SIZE {
            free.push(buf);
        }
    }

    /// Returns the number of idle buffers in the pool.
    pub fn len(&self) -> usize {
        self.free.lock().len()
    }

    /// Returns true if no idle buffers are pooled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_fresh() {
        let pool = BufferPool::new();
        let buf = pool.checkout(1024);
        assert!(buf.capacity() >= 1024);
        assert!(buf.is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_buffer_reuse() {
        let pool = BufferPool::new();
        let mut buf = pool.checkout(2048);
        buf.extend_from_slice(b"test data");
        pool.restore(buf);

        let again = pool.checkout(1024);
        assert!(again.is_empty());
        assert!(again.capacity() >= 2048);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_too_small_is_not_reused() {
        let pool = BufferPool::new();
        pool.restore(Vec::with_capacity(16));
        let buf = pool.checkout(4096);
        assert!(buf.capacity() >= 4096);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pool_is_bounded() {
        let pool = BufferPool::new();
        for _ in 0..MAX_POOL_SIZE + 3 {
            pool.restore(Vec::with_capacity(64));
        }
        assert_eq!(pool.len(), MAX_POOL_SIZE);

        pool.checkout(64);
        pool.restore(Vec::with_capacity(MAX_RETAINED_CAPACITY + 1));
        assert_eq!(pool.len(), MAX_POOL_SIZE - 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let pool = BufferPool::new();
        let other = pool.clone();
        other.restore(Vec::with_capacity(128));
        assert_eq!(pool.len(), 1);
    }
}
