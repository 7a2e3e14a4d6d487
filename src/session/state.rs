use std::fmt;

/// The phase a [`PumpSession`](crate::PumpSession) is in.
///
/// A session starts in `Reading` and ends in either `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PumpState {
    /// About to request the next chunk from the source.
    #[default]
    Reading,

    /// Appending a chunk (or a carried-over leftover) to the buffer.
    Accumulating,

    /// Writing the filled region to the sink.
    Flushing,

    /// The source closed; ending the sink.
    Closing,

    /// Every byte was delivered.
    Done,

    /// The pump stopped on an error or cancellation.
    Failed,
}

impl PumpState {
    /// Returns true for `Done` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, PumpState::Done | PumpState::Failed)
    }
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PumpState::Reading => "reading",
            PumpState::Accumulating => "accumulating",
            PumpState::Flushing => "flushing",
            PumpState::Closing => "closing",
            PumpState::Done => "done",
            PumpState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!PumpState::default().is_terminal());
        assert!(!PumpState::Flushing.is_terminal());
        assert!(PumpState::Done.is_terminal());
        assert!(PumpState::Failed.is_terminal());
        assert_eq!(PumpState::Closing.to_string(), "closing");
    }
}
