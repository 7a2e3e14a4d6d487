//! Chunk types.
//!
//! - [`Chunk`] - One unit of bytes (or UTF-8 text) yielded by a source

mod data;

pub use data::Chunk;
