//! pumprs
//!
//! Adaptive-batching stream pump for Rust.
//!
//! `pumprs` moves every byte from a pull-based [`Source`] into an async
//! [`Sink`], issuing as few writes as it can without ever delaying data:
//!
//! - chunks the source hands over synchronously are gathered into one write
//! - a chunk that needed a real suspension is written at once
//! - no write is ever larger than the configured capacity cap
//!
//! The crate intentionally:
//! - does NOT spawn tasks or pick a runtime
//! - does NOT read ahead while a write is in flight
//! - does NOT retry failed reads or writes
//!
//! It only does one thing: **pull chunks → batch them → write them**
//!
//! # Basic use
//!
//! ```
//! use pumprs::{pump, IterSource, MemorySink, PumpConfig};
//!
//! # tokio_test::block_on(async {
//! let source = IterSource::new(vec![vec![0u8; 64]; 256]);
//! let mut sink = MemorySink::new();
//!
//! let total = pump(source, &mut sink, PumpConfig::default()).await?;
//! assert_eq!(total, 16384);
//! assert_eq!(sink.write_count(), 1);
//! # Ok::<(), pumprs::PumpError>(())
//! # }).unwrap();
//! ```
//!
//! # Async I/O (feature = "async-io")
//!
//! ```ignore
//! use pumprs::{pump, AsyncReadSource, AsyncWriteSink, PumpConfig};
//! use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};
//!
//! async fn copy(
//!     reader: tokio::net::TcpStream,
//!     writer: tokio::fs::File,
//! ) -> Result<u64, pumprs::PumpError> {
//!     let source = AsyncReadSource::new(reader.compat());
//!     let sink = AsyncWriteSink::new(writer.compat_write());
//!     pump(source, sink, PumpConfig::default()).await
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod config;
mod error;
mod session;
mod sink;
mod source;

mod buffer; // internal accumulation buffer and pool
mod util;

//
// Public surface
//

pub use buffer::{BufferPool, MAX_POOL_SIZE, MAX_RETAINED_CAPACITY};
pub use chunk::Chunk;
pub use config::{DEFAULT_CAPACITY, DEFAULT_CAPACITY_CAP, ErrorFlush, PumpConfig};
pub use error::PumpError;
pub use session::{PumpSession, PumpState, pump};
pub use sink::{MemorySink, Sink};
pub use source::{IterSource, Pull, PullResult, Source, StreamSource};

#[cfg(feature = "async-io")]
pub use sink::AsyncWriteSink;
#[cfg(feature = "async-io")]
pub use source::{AsyncReadSource, DEFAULT_READ_CHUNK_SIZE};
