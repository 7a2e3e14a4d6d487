#![no_main]

use libfuzzer_sys::fuzz_target;
use pumprs::{Chunk, MemorySink, Pull, PumpConfig, Source, pump};

/// Splits the input into chunks; each length byte also picks sync or suspended delivery.
struct Framed<'a> {
    input: &'a [u8],
}

impl Source for Framed<'_> {
    fn pull(&mut self) -> Pull<'_> {
        let Some((&header, rest)) = self.input.split_first() else {
            return Pull::closed();
        };
        let len = usize::from(header >> 1).min(rest.len());
        let (chunk, rest) = rest.split_at(len);
        self.input = rest;

        let chunk = Chunk::from(chunk.to_vec());
        if header & 1 == 0 {
            Pull::chunk(chunk)
        } else {
            Pull::pending(async move { Ok(Some(chunk)) })
        }
    }
}

/// Payload bytes in production order.
fn payload(mut input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some((&header, rest)) = input.split_first() {
        let len = usize::from(header >> 1).min(rest.len());
        out.extend_from_slice(&rest[..len]);
        input = &rest[len..];
    }
    out
}

fuzz_target!(|data: &[u8]| {
    let Some((&capacity, input)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(capacity).max(1);
    let config = PumpConfig::new(capacity, capacity).unwrap();

    let mut sink = MemorySink::new();
    let total = futures::executor::block_on(pump(Framed { input }, &mut sink, config)).unwrap();

    // Verify: exact delivery in order
    let expected = payload(input);
    assert_eq!(total, expected.len() as u64);
    assert_eq!(sink.data(), &expected[..]);

    // Verify: no write above capacity, no empty writes
    for &size in sink.write_sizes() {
        assert!(size > 0 && size <= capacity);
    }
});
