//! Benchmarks for pumprs.
//!
//! Run with:
//!     cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use pumprs::{
    BufferPool, Chunk, IterSource, MemorySink, Pull, PumpConfig, PumpSession, Source, pump,
};

/// Yields every chunk after a suspension.
struct Trickle {
    chunks: std::vec::IntoIter<Chunk>,
}

impl Source for Trickle {
    fn pull(&mut self) -> Pull<'_> {
        match self.chunks.next() {
            Some(chunk) => Pull::pending(async move {
                tokio::task::yield_now().await;
                Ok(Some(chunk))
            }),
            None => Pull::closed(),
        }
    }
}

fn split(data: &[u8], size: usize) -> Vec<Chunk> {
    data.chunks(size).map(|c| Chunk::from(c.to_vec())).collect()
}

fn bench_batching(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("batching");
    let size = 1024 * 1024; // 1 MB
    let data: Vec<u8> = (0..size).map(|i| (i * 7 + 13) as u8).collect();
    group.throughput(Throughput::Bytes(size as u64));

    // Small synchronous chunks, batched into full buffers
    for chunk_size in [64, 1024, 16 * 1024] {
        let chunks = split(&data, chunk_size);
        let chunks = &chunks;
        group.bench_function(format!("sync_{}b", chunk_size), |b| {
            b.to_async(&runtime).iter(|| async move {
                let mut sink = MemorySink::new();
                let source = IterSource::new(black_box(chunks.clone()));
                pump(source, &mut sink, PumpConfig::default()).await.unwrap();
                black_box(sink.write_count())
            });
        });
    }

    // Suspended chunks, one write each
    let chunks = split(&data, 16 * 1024);
    let chunks = &chunks;
    group.bench_function("suspended_16kb", |b| {
        b.to_async(&runtime).iter(|| async move {
            let mut sink = MemorySink::new();
            let source = Trickle {
                chunks: black_box(chunks.clone()).into_iter(),
            };
            pump(source, &mut sink, PumpConfig::default()).await.unwrap();
            black_box(sink.write_count())
        });
    });

    group.finish();
}

fn bench_leftovers(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("leftovers");
    let size = 2 * 1024 * 1024; // 2 MB
    let chunks = vec![Chunk::from(vec![0x5Au8; size / 4]); 4];
    let chunks = &chunks;
    group.throughput(Throughput::Bytes(size as u64));

    // Oversized chunks split into capacity-sized writes
    group.bench_function("oversized_chunks", |b| {
        let config = PumpConfig::new(128 * 1024, 32 * 1024).unwrap();
        b.to_async(&runtime).iter(|| async move {
            let mut sink = MemorySink::new();
            pump(IterSource::new(chunks.clone()), &mut sink, config)
                .await
                .unwrap();
            black_box(sink.write_count())
        });
    });

    // Same, with the buffer reused from a pool
    group.bench_function("pooled", |b| {
        let pool = BufferPool::new();
        let pool = &pool;
        b.to_async(&runtime).iter(|| async move {
            let mut session = PumpSession::new(PumpConfig::default())
                .unwrap()
                .with_pool(pool.clone());
            let mut sink = MemorySink::new();
            session
                .run(&mut IterSource::new(chunks.clone()), &mut sink)
                .await
                .unwrap();
            black_box(sink.write_count())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_batching, bench_leftovers);
criterion_main!(benches);
