//! Pumping a `futures` stream.
//!
//! A stream that already holds its items is drained in one write; a stream
//! that has to wait between items gets each one written as it arrives.
//!
//! Run with:
//!     cargo run --example async_stream

use std::io;
use std::time::Duration;

use futures_util::stream;
use pumprs::{MemorySink, PumpConfig, StreamSource, pump};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let lines: Vec<String> = (0..20).map(|i| format!("line {}\n", i)).collect();

    // Ready stream: everything is batched
    let ready = stream::iter(lines.clone().into_iter().map(Ok::<_, io::Error>));
    let mut sink = MemorySink::new();
    let total = pump(StreamSource::new(ready), &mut sink, PumpConfig::default()).await?;
    println!("ready stream:   {} bytes in {} write(s)", total, sink.write_count());

    // Slow stream: each line waits for a timer, so each is flushed on arrival
    let slow = stream::unfold(lines.into_iter(), |mut lines| async move {
        let line = lines.next()?;
        tokio::time::sleep(Duration::from_millis(2)).await;
        Some((Ok::<_, io::Error>(line), lines))
    });
    let mut sink = MemorySink::new();
    let total = pump(StreamSource::new(Box::pin(slow)), &mut sink, PumpConfig::default()).await?;
    println!("slow stream:    {} bytes in {} write(s)", total, sink.write_count());
    println!("write sizes:    {:?}", sink.write_sizes());

    Ok(())
}
