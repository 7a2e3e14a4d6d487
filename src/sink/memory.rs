//! In-memory sink.

use std::io;

use bytes::Bytes;

use super::Sink;
use crate::error::PumpError;

/// A sink that keeps everything written to it.
///
/// Besides the bytes it records the size of each write, so callers can see
/// how a pump batched its output.
///
/// # Example
///
/// ```
/// use pumprs::{pump, IterSource, MemorySink, PumpConfig};
///
/// # tokio_test::block_on(async {
/// let mut source = IterSource::new(vec!["hello", " ", "world"]);
/// let mut sink = MemorySink::new();
///
/// let total = pump(&mut source, &mut sink, PumpConfig::default()).await?;
/// assert_eq!(total, 11);
/// assert_eq!(sink.data(), b"hello world");
/// assert_eq!(sink.write_sizes(), &[11]);
/// assert!(sink.is_ended());
/// # Ok::<(), pumprs::PumpError>(())
/// # }).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    data: Vec<u8>,
    write_sizes: Vec<usize>,
    vectored_writes: usize,
    ended: bool,
    abort_reason: Option<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the sink and returns the written bytes.
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.data)
    }

    /// Returns the size of every write, in order.
    pub fn write_sizes(&self) -> &[usize] {
        &self.write_sizes
    }

    /// Returns the number of writes issued.
    pub fn write_count(&self) -> usize {
        self.write_sizes.len()
    }

    /// Returns how many of the writes were vectored.
    pub fn vectored_write_count(&self) -> usize {
        self.vectored_writes
    }

    /// Returns true once [`Sink::end`] has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns the reason passed to [`Sink::abort`], if it was called.
    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    fn check_open(&self) -> io::Result<()> {
        if self.ended {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write after end"));
        }
        Ok(())
    }
}

impl Sink for MemorySink {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.check_open()?;
        self.data.extend_from_slice(bytes);
        self.write_sizes.push(bytes.len());
        Ok(())
    }

    async fn write_vectored(&mut self, pieces: &[&[u8]]) -> io::Result<()> {
        self.check_open()?;
        let mut total = 0;
        for piece in pieces {
            self.data.extend_from_slice(piece);
            total += piece.len();
        }
        self.write_sizes.push(total);
        self.vectored_writes += 1;
        Ok(())
    }

    async fn end(&mut self) -> io::Result<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self, reason: &PumpError) {
        self.abort_reason = Some(reason.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_writes() {
        let mut sink = MemorySink::new();
        sink.write(b"abc").await.unwrap();
        sink.write_vectored(&[b"de", b"f"]).await.unwrap();

        assert_eq!(sink.data(), b"abcdef");
        assert_eq!(sink.write_sizes(), &[3, 3]);
        assert_eq!(sink.write_count(), 2);
        assert_eq!(sink.vectored_write_count(), 1);
        assert!(!sink.is_ended());
    }

    #[tokio::test]
    async fn test_write_after_end_fails() {
        let mut sink = MemorySink::new();
        sink.end().await.unwrap();
        let err = sink.write(b"late").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_abort_is_recorded() {
        let mut sink = MemorySink::new();
        sink.abort(&PumpError::Cancelled);
        assert_eq!(sink.abort_reason(), Some("pump cancelled"));
        assert!(sink.into_bytes().is_empty());
    }
}
