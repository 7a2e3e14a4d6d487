//! Pumping between tokio I/O objects.
//!
//! A producer task writes into one end of an in-memory pipe in bursts; the
//! pump reads the other end and writes into a counting writer. Bytes that
//! are already in the pipe are batched, a read that has to wait is flushed.
//!
//! Run with:
//!     cargo run --example async_tokio --features async-io

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_io::AsyncWrite;
use pumprs::{AsyncReadSource, AsyncWriteSink, PumpConfig, pump};
use tokio::io::AsyncWriteExt;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Collects bytes and remembers the size of every write.
#[derive(Default)]
struct Recorder {
    data: Vec<u8>,
    writes: Vec<usize>,
}

impl AsyncWrite for Recorder {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.data.extend_from_slice(buf);
        this.writes.push(buf.len());
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = tokio::io::duplex(64 * 1024);

    let producer = tokio::spawn(async move {
        for burst in 0..5u8 {
            writer.write_all(&vec![burst; 10_000]).await?;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        writer.shutdown().await
    });

    let source = AsyncReadSource::new(reader.compat()).with_chunk_size(1024);
    let mut sink = AsyncWriteSink::new(Recorder::default());
    let total = pump(source, &mut sink, PumpConfig::default()).await?;
    producer.await??;

    let recorder = sink.into_inner();
    println!("pumped {} bytes in {} writes", total, recorder.writes.len());
    println!("write sizes: {:?}", recorder.writes);
    assert_eq!(recorder.data.len() as u64, total);

    Ok(())
}
