//! Source adapter over `futures_io::AsyncRead`.
//!
//! Uses `futures_io::AsyncRead`, so it works with any runtime. Tokio users
//! can bridge with `tokio_util::compat`:
//!
//! ```ignore
//! use tokio_util::compat::TokioAsyncReadCompatExt;
//! use pumprs::AsyncReadSource;
//!
//! let file = tokio::fs::File::open("data.bin").await?;
//! let len = file.metadata().await?.len();
//! let source = AsyncReadSource::new(file.compat()).with_expected_length(len);
//! ```

use std::future::Future;
use std::io;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use futures_io::AsyncRead;

use super::{Pull, PullResult, Source};
use crate::chunk::Chunk;

/// Default number of bytes read per pull (4 KiB).
pub const DEFAULT_READ_CHUNK_SIZE: usize = 4096;

/// A source that reads auto-allocated chunks from an async reader.
///
/// Each pull performs at most one `poll_read` into a fresh buffer of
/// `chunk_size` bytes. A read that completes without suspending is reported
/// as synchronous, so data the reader already holds gets batched.
#[derive(Debug)]
pub struct AsyncReadSource<R> {
    reader: R,
    chunk_size: usize,
    scratch: Vec<u8>,
    expected_length: Option<u64>,
    disconnect_as_eof: bool,
    finished: bool,
}

impl<R> AsyncReadSource<R> {
    /// Creates a source reading [`DEFAULT_READ_CHUNK_SIZE`] bytes per pull.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            chunk_size: DEFAULT_READ_CHUNK_SIZE,
            scratch: Vec::new(),
            expected_length: None,
            disconnect_as_eof: false,
            finished: false,
        }
    }

    /// Sets the number of bytes read per pull (at least 1).
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Declares the total number of bytes the reader yields.
    pub fn with_expected_length(mut self, len: u64) -> Self {
        self.expected_length = Some(len);
        self
    }

    /// Treats a disconnected reader as end of stream instead of an error.
    pub fn with_disconnect_as_eof(mut self, enabled: bool) -> Self {
        self.disconnect_as_eof = enabled;
        self
    }

    /// Returns the number of bytes read per pull.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Consumes the adapter and returns the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}

impl<R: AsyncRead + Unpin> AsyncReadSource<R> {
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<PullResult> {
        if self.scratch.len() != self.chunk_size {
            self.scratch.resize(self.chunk_size, 0);
        }

        let result = loop {
            match Pin::new(&mut self.reader).poll_read(cx, &mut self.scratch) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Poll::Ready(result) => break result,
            }
        };

        Poll::Ready(match result {
            Ok(0) => {
                self.finished = true;
                Ok(None)
            }
            Ok(n) => {
                let mut data = mem::take(&mut self.scratch);
                data.truncate(n);
                Ok(Some(Chunk::from(data)))
            }
            Err(e) if self.disconnect_as_eof && is_disconnect(&e) => {
                tracing::debug!(error = %e, "reader disconnected, treating as end of stream");
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        })
    }
}

/// Completes a read whose first attempt found no data.
struct NextRead<'a, R> {
    source: &'a mut AsyncReadSource<R>,
}

impl<R: AsyncRead + Unpin> Future for NextRead<'_, R> {
    type Output = PullResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().source.poll_chunk(cx)
    }
}

impl<R: AsyncRead + Unpin + Send> Source for AsyncReadSource<R> {
    fn pull(&mut self) -> Pull<'_> {
        if self.finished {
            return Pull::closed();
        }

        let mut probe = Context::from_waker(Waker::noop());
        match self.poll_chunk(&mut probe) {
            Poll::Ready(result) => Pull::Ready(result),
            Poll::Pending => Pull::pending(NextRead { source: self }),
        }
    }

    fn expected_length(&self) -> Option<u64> {
        self.expected_length
    }
}
