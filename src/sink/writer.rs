//! Sink adapter over `futures_io::AsyncWrite`.
//!
//! Tokio writers can be bridged with `tokio_util::compat`:
//!
//! ```ignore
//! use tokio_util::compat::TokioAsyncWriteCompatExt;
//! use pumprs::AsyncWriteSink;
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:8080").await?;
//! let sink = AsyncWriteSink::new(stream.compat_write());
//! ```

use std::future::poll_fn;
use std::io::{self, IoSlice};
use std::pin::Pin;

use futures_io::AsyncWrite;

use super::Sink;

/// A sink that writes to an async writer.
///
/// Short writes are retried until the whole region is accepted. Vectored
/// writes go through `poll_write_vectored`, and `end` flushes and closes
/// the writer.
#[derive(Debug)]
pub struct AsyncWriteSink<W> {
    writer: W,
}

impl<W> AsyncWriteSink<W> {
    /// Creates a sink over the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns a reference to the writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the adapter and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn write_zero() -> io::Error {
    io::Error::new(io::ErrorKind::WriteZero, "writer accepted zero bytes")
}

impl<W: AsyncWrite + Unpin> Sink for AsyncWriteSink<W> {
    async fn write(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let n = poll_fn(|cx| Pin::new(&mut self.writer).poll_write(cx, bytes)).await?;
            if n == 0 {
                return Err(write_zero());
            }
            bytes = &bytes[n..];
        }
        Ok(())
    }

    async fn write_vectored(&mut self, pieces: &[&[u8]]) -> io::Result<()> {
        let mut storage: Vec<IoSlice<'_>> = pieces
            .iter()
            .filter(|piece| !piece.is_empty())
            .map(|piece| IoSlice::new(piece))
            .collect();
        let mut slices = &mut storage[..];

        while !slices.is_empty() {
            let n = poll_fn(|cx| Pin::new(&mut self.writer).poll_write_vectored(cx, &*slices))
                .await?;
            if n == 0 {
                return Err(write_zero());
            }
            IoSlice::advance_slices(&mut slices, n);
        }
        Ok(())
    }

    async fn end(&mut self) -> io::Result<()> {
        poll_fn(|cx| Pin::new(&mut self.writer).poll_flush(cx)).await?;
        poll_fn(|cx| Pin::new(&mut self.writer).poll_close(cx)).await
    }
}
