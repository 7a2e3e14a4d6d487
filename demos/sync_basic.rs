//! Pumping a source whose chunks are all available up front.
//!
//! Every pull resolves synchronously, so many small chunks collapse into a
//! few buffer-sized writes.
//!
//! Run with:
//!     cargo run --example sync_basic

use pumprs::{IterSource, MemorySink, PumpConfig, PumpError, PumpSession};

fn main() -> Result<(), PumpError> {
    // 1 MB of data in 1000-byte pieces
    let data: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
    let pieces: Vec<Vec<u8>> = data.chunks(1000).map(|c| c.to_vec()).collect();

    println!("Pumping {} bytes in {} chunks...\n", data.len(), pieces.len());

    for capacity in [4 * 1024, 16 * 1024, 128 * 1024] {
        let mut session = PumpSession::new(PumpConfig::new(capacity, capacity)?)?;
        let mut source = IterSource::new(pieces.clone());
        let mut sink = MemorySink::new();

        let total = tokio_test::block_on(session.run(&mut source, &mut sink))?;
        assert_eq!(sink.data(), &data[..]);

        println!(
            "capacity {:>6}: {} bytes in {} writes ({} vectored)",
            capacity,
            total,
            session.writes_issued(),
            sink.vectored_write_count()
        );
    }

    // With a length hint the buffer is sized to the whole transfer (up to the cap)
    let mut sink = MemorySink::new();
    let source = IterSource::new(pieces).with_expected_length(data.len() as u64);
    let config = PumpConfig::default().with_capacity_cap(2 * 1024 * 1024);
    tokio_test::block_on(pumprs::pump(source, &mut sink, config))?;
    println!("\nwith length hint: {} write(s)", sink.write_count());

    Ok(())
}
