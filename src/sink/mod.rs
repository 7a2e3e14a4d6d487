//! The write side of a pump.
//!
//! - [`Sink`] - Async write target with scalar and vectored writes
//! - [`MemorySink`] - Collects everything written, in memory
//! - `AsyncWriteSink` - Sink over a `futures_io::AsyncWrite` (feature `async-io`)

mod memory;

#[cfg(feature = "async-io")]
mod writer;

use std::io;

use crate::error::PumpError;

pub use memory::MemorySink;

#[cfg(feature = "async-io")]
pub use writer::AsyncWriteSink;

/// An asynchronous write target.
///
/// Every write may suspend; that is how a sink applies backpressure. Each
/// call is all-or-nothing from the pump's point of view: either the whole
/// region was accepted or an error is returned.
///
/// The methods are `async fn`, so `Sink` is used through generics rather
/// than `dyn Sink`. `&mut K` and `Box<K>` forward to `K`, which lets a
/// boxed sink of a concrete type be handed to the pump.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Writes one contiguous region.
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Writes several regions as one operation.
    ///
    /// The default joins the pieces and issues a single [`Sink::write`].
    async fn write_vectored(&mut self, pieces: &[&[u8]]) -> io::Result<()> {
        let joined = crate::util::join_pieces(pieces);
        self.write(&joined).await
    }

    /// Signals that no further writes will follow.
    async fn end(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called when a pump into this sink fails for a reason other than a
    /// failed write, such as a source error or cancellation.
    fn abort(&mut self, _reason: &PumpError) {}
}

impl<K: Sink + ?Sized> Sink for &mut K {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes).await
    }

    async fn write_vectored(&mut self, pieces: &[&[u8]]) -> io::Result<()> {
        (**self).write_vectored(pieces).await
    }

    async fn end(&mut self) -> io::Result<()> {
        (**self).end().await
    }

    fn abort(&mut self, reason: &PumpError) {
        (**self).abort(reason)
    }
}

impl<K: Sink + ?Sized> Sink for Box<K> {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write(bytes).await
    }

    async fn write_vectored(&mut self, pieces: &[&[u8]]) -> io::Result<()> {
        (**self).write_vectored(pieces).await
    }

    async fn end(&mut self) -> io::Result<()> {
        (**self).end().await
    }

    fn abort(&mut self, reason: &PumpError) {
        (**self).abort(reason)
    }
}
