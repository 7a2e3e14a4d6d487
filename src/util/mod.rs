//! Internal utility functions and helpers.
//!
//! This module contains small helper functions used throughout the crate.
//! It is an implementation detail and not part of the public API.

/// Concatenates the pieces of a vectored write into one contiguous buffer.
///
/// Used by sinks that have no native vectored write.
pub(crate) fn join_pieces(pieces: &[&[u8]]) -> Vec<u8> {
    let total = pieces.iter().map(|p| p.len()).sum();
    let mut joined = Vec::with_capacity(total);
    for piece in pieces {
        joined.extend_from_slice(piece);
    }
    joined
}
