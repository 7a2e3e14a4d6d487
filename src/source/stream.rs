//! Source adapter over `futures_core::Stream`.
//!
//! The adapter probes the stream once with a no-op waker. An item that is
//! already there is handed to the pump as [`Pull::Ready`]; otherwise the
//! pull becomes [`Pull::Pending`] and the stream is polled again with the
//! pump's real waker, which registers for the wakeup.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::stream;
//! use pumprs::{pump, MemorySink, PumpConfig, StreamSource};
//!
//! let chunks = stream::iter(vec![Ok::<_, std::io::Error>("a"), Ok("b")]);
//! let mut source = StreamSource::new(chunks);
//! let mut sink = MemorySink::new();
//! let total = pump(&mut source, &mut sink, PumpConfig::default()).await?;
//! ```

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use futures_core::Stream;

use super::{Pull, PullResult, Source};
use crate::chunk::Chunk;

/// A source that yields the items of a stream.
///
/// Items are `Result<T, E>` where `T` converts into a [`Chunk`] and `E`
/// into an [`io::Error`]. The stream is not polled again after it ends or
/// yields an error.
///
/// The stream has to be `Send` and `Unpin`; wrap it with `Box::pin` if it
/// is not `Unpin`.
#[derive(Debug)]
pub struct StreamSource<S> {
    stream: S,
    expected_length: Option<u64>,
    finished: bool,
}

impl<S> StreamSource<S> {
    /// Creates a source over the given stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            expected_length: None,
            finished: false,
        }
    }

    /// Declares the total number of bytes the stream yields.
    pub fn with_expected_length(mut self, len: u64) -> Self {
        self.expected_length = Some(len);
        self
    }

    /// Consumes the adapter and returns the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn settle<T, E>(finished: &mut bool, item: Option<Result<T, E>>) -> PullResult
where
    T: Into<Chunk>,
    E: Into<io::Error>,
{
    match item {
        Some(Ok(chunk)) => Ok(Some(chunk.into())),
        Some(Err(e)) => {
            *finished = true;
            Err(e.into())
        }
        None => {
            *finished = true;
            Ok(None)
        }
    }
}

/// Completes a pull whose probe found the stream not ready.
struct NextChunk<'a, S> {
    source: &'a mut StreamSource<S>,
}

impl<S, T, E> Future for NextChunk<'_, S>
where
    S: Stream<Item = Result<T, E>> + Unpin,
    T: Into<Chunk>,
    E: Into<io::Error>,
{
    type Output = PullResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self.get_mut().source;
        Pin::new(&mut this.stream)
            .poll_next(cx)
            .map(|item| settle(&mut this.finished, item))
    }
}

impl<S, T, E> Source for StreamSource<S>
where
    S: Stream<Item = Result<T, E>> + Unpin + Send,
    T: Into<Chunk>,
    E: Into<io::Error>,
{
    fn pull(&mut self) -> Pull<'_> {
        if self.finished {
            return Pull::closed();
        }

        let mut probe = Context::from_waker(Waker::noop());
        let polled = Pin::new(&mut self.stream).poll_next(&mut probe);
        match polled {
            Poll::Ready(item) => Pull::Ready(settle(&mut self.finished, item)),
            Poll::Pending => Pull::pending(NextChunk { source: self }),
        }
    }

    fn expected_length(&self) -> Option<u64> {
        self.expected_length
    }
}
