//! The pump itself.
//!
//! - [`PumpSession`] - One source-to-sink transfer, driven as a state machine
//! - [`PumpState`] - The phases of that state machine
//! - [`pump`] - Runs a fresh session with the given config

mod engine;
mod state;

pub use engine::{PumpSession, pump};
pub use state::PumpState;
