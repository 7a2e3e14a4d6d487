//! The pull side of a pump.
//!
//! - [`Source`] - Pull-based chunk producer with an optional length hint
//! - [`Pull`] - Whether a pull resolved synchronously or needs to suspend
//! - [`IterSource`] - Source over an iterator; every pull is synchronous
//! - [`StreamSource`] - Source over a `futures_core::Stream`
//! - `AsyncReadSource` - Source over a `futures_io::AsyncRead` (feature `async-io`)
//!
//! The batching policy of the pump depends on a single fact per pull: did
//! the chunk arrive without a real suspension? Sources state this
//! explicitly by returning [`Pull::Ready`] or [`Pull::Pending`].

mod iter;
mod stream;

#[cfg(feature = "async-io")]
mod reader;

use std::future::Future;
use std::io;

use futures_core::future::BoxFuture;

use crate::chunk::Chunk;
use crate::error::PumpError;

pub use iter::IterSource;
pub use stream::StreamSource;

#[cfg(feature = "async-io")]
pub use reader::{AsyncReadSource, DEFAULT_READ_CHUNK_SIZE};

/// The result of one pull: the next chunk, `None` once closed, or an error.
pub type PullResult = io::Result<Option<Chunk>>;

/// The outcome of [`Source::pull`].
pub enum Pull<'a> {
    /// The pull resolved within the current turn.
    Ready(PullResult),

    /// The pull must wait for an external event. The pump awaits the future
    /// and treats the chunk it yields as asynchronously produced.
    ///
    /// The future is `Send`, so a pump over a `Send` source and sink can be
    /// spawned onto a multi-threaded runtime.
    Pending(BoxFuture<'a, PullResult>),
}

impl<'a> Pull<'a> {
    /// A chunk available right now.
    pub fn chunk(chunk: impl Into<Chunk>) -> Self {
        Pull::Ready(Ok(Some(chunk.into())))
    }

    /// The source is closed.
    pub fn closed() -> Self {
        Pull::Ready(Ok(None))
    }

    /// The source failed.
    pub fn error(err: io::Error) -> Self {
        Pull::Ready(Err(err))
    }

    /// A pull that completes once `fut` resolves.
    pub fn pending(fut: impl Future<Output = PullResult> + Send + 'a) -> Self {
        Pull::Pending(Box::pin(fut))
    }

    /// Returns true if the pull resolved synchronously.
    pub fn is_ready(&self) -> bool {
        matches!(self, Pull::Ready(_))
    }
}

impl std::fmt::Debug for Pull<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pull::Ready(result) => f.debug_tuple("Ready").field(result).finish(),
            Pull::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A pull-based producer of chunks.
///
/// The pump never holds two outstanding pulls: it does not call `pull`
/// again until the previous one has resolved and its chunk has been
/// accommodated.
pub trait Source {
    /// Requests the next chunk.
    fn pull(&mut self) -> Pull<'_>;

    /// Total number of bytes this source expects to produce, if known.
    ///
    /// Queried once when a pump starts.
    fn expected_length(&self) -> Option<u64> {
        None
    }

    /// Called when a pump over this source fails for a reason other than a
    /// failed pull, such as a sink error or cancellation.
    fn cancel(&mut self, _reason: &PumpError) {}
}

impl<S: Source + ?Sized> Source for &mut S {
    fn pull(&mut self) -> Pull<'_> {
        (**self).pull()
    }

    fn expected_length(&self) -> Option<u64> {
        (**self).expected_length()
    }

    fn cancel(&mut self, reason: &PumpError) {
        (**self).cancel(reason)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn pull(&mut self) -> Pull<'_> {
        (**self).pull()
    }

    fn expected_length(&self) -> Option<u64> {
        (**self).expected_length()
    }

    fn cancel(&mut self, reason: &PumpError) {
        (**self).cancel(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u8);

    impl Source for Countdown {
        fn pull(&mut self) -> Pull<'_> {
            if self.0 == 0 {
                return Pull::closed();
            }
            self.0 -= 1;
            Pull::chunk(vec![self.0])
        }
    }

    #[test]
    fn test_pull_helpers() {
        assert!(Pull::chunk("x").is_ready());
        assert!(Pull::closed().is_ready());
        assert!(Pull::error(io::Error::from(io::ErrorKind::Other)).is_ready());
        assert!(!Pull::pending(async { Ok(None) }).is_ready());
        assert_eq!(format!("{:?}", Pull::pending(async { Ok(None) })), "Pending(..)");
    }

    #[test]
    fn test_boxed_source_is_object_safe() {
        let mut source: Box<dyn Source> = Box::new(Countdown(2));
        assert!(source.expected_length().is_none());
        assert!(matches!(source.pull(), Pull::Ready(Ok(Some(_)))));
        assert!(matches!(source.pull(), Pull::Ready(Ok(Some(_)))));
        assert!(matches!(source.pull(), Pull::Ready(Ok(None))));
    }
}
