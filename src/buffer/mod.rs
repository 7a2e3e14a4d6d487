//! Buffer management for the pump.
//!
//! - `AccumulationBuffer` - per-pump buffer that batches chunks between writes
//!   and carries the leftover of an overflowing chunk (internal)
//! - [`BufferPool`] - explicit checkout/return arena for reusing buffer storage

mod accumulate;
mod pool;

pub(crate) use accumulate::{AccumulationBuffer, Append, WritePlan};
pub use pool::{BufferPool, MAX_POOL_SIZE, MAX_RETAINED_CAPACITY};
