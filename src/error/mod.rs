//! Error types for pumprs.

use std::io;

use thiserror::Error;

/// Errors that can end a pump.
///
/// Every variant aborts the pump; nothing is retried internally. The variant
/// tells the caller which side failed.
#[derive(Debug, Error)]
pub enum PumpError {
    /// The source failed to produce a chunk.
    #[error("source error: {0}")]
    Source(#[source] io::Error),

    /// A write (or the final `end`) on the sink failed.
    #[error("sink write error: {0}")]
    SinkWrite(#[source] io::Error),

    /// The cancellation token was observed at a safe point.
    #[error("pump cancelled")]
    Cancelled,

    /// Invalid capacity configuration.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// The session has already run to completion and cannot be reused.
    #[error("pump session already finished")]
    SessionFinished,
}

impl PumpError {
    /// Returns true if the source side failed.
    pub fn is_source(&self) -> bool {
        matches!(self, PumpError::Source(_))
    }

    /// Returns true if the sink side failed.
    pub fn is_sink(&self) -> bool {
        matches!(self, PumpError::SinkWrite(_))
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            PumpError::Source(e) | PumpError::SinkWrite(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_source_error_sides() {
        let err = PumpError::Source(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(err.is_source());
        assert!(!err.is_sink());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_sink_error_sides() {
        let err = PumpError::SinkWrite(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(err.is_sink());
        assert!(!err.is_source());
        assert_eq!(err.io_error().map(io::Error::kind), Some(io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_display() {
        let err = PumpError::InvalidConfig {
            message: "default_capacity must be non-zero",
        };
        assert!(err.to_string().contains("invalid config"));
        assert_eq!(PumpError::Cancelled.to_string(), "pump cancelled");
        assert!(PumpError::Cancelled.io_error().is_none());
    }
}
