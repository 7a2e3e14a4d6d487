//! Configuration for pump behavior.
//!
//! - [`PumpConfig`] - Buffer capacity bounds and end-of-pump behavior
//! - [`ErrorFlush`] - What happens to buffered bytes when the pump fails
//!
//! # Example
//!
//! ```
//! use pumprs::{ErrorFlush, PumpConfig};
//!
//! // Custom capacities
//! let config = PumpConfig::new(64 * 1024, 16 * 1024)?;
//!
//! // Keep the sink open after the pump, write what was buffered on source errors
//! let config = PumpConfig::default()
//!     .with_end_after_pump(false)
//!     .with_error_flush(ErrorFlush::BestEffort);
//!
//! # Ok::<(), pumprs::PumpError>(())
//! ```

use crate::error::PumpError;

/// Default buffer capacity when the source does not report a length (16 KiB).
pub const DEFAULT_CAPACITY: usize = 16 * 1024;

/// Default upper bound for a single write (128 KiB).
pub const DEFAULT_CAPACITY_CAP: usize = 128 * 1024;

/// Configuration for a pump.
///
/// The accumulation buffer is sized once per pump:
///
/// - the source reports a non-zero length `n` → `min(n, capacity_cap)`
/// - otherwise → `default_capacity`
///
/// No write issued by the pump is ever larger than the chosen capacity, and
/// therefore never larger than `capacity_cap`.
///
/// Size constraints: both capacities non-zero, `default_capacity <= capacity_cap`.
///
/// # Example
///
/// ```
/// use pumprs::PumpConfig;
///
/// let config = PumpConfig::new(16384, 16384)?;
/// assert_eq!(config.capacity_for(None), 16384);
/// assert_eq!(config.capacity_for(Some(100)), 100);
/// assert_eq!(config.capacity_for(Some(1 << 30)), 16384);
/// # Ok::<(), pumprs::PumpError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PumpConfig {
    /// Largest buffer (and write) the pump may use.
    capacity_cap: usize,

    /// Buffer size used when the total length is unknown.
    default_capacity: usize,

    /// Whether the sink is ended once the source closes.
    end_after_pump: bool,

    /// Policy for bytes still buffered when the pump fails.
    error_flush: ErrorFlush,
}

impl PumpConfig {
    /// Creates a new configuration with the given capacity bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PumpError::InvalidConfig`] if:
    /// - Either capacity is zero
    /// - `default_capacity > capacity_cap`
    pub fn new(capacity_cap: usize, default_capacity: usize) -> Result<Self, PumpError> {
        if capacity_cap == 0 {
            return Err(PumpError::InvalidConfig {
                message: "capacity_cap must be non-zero",
            });
        }

        if default_capacity == 0 {
            return Err(PumpError::InvalidConfig {
                message: "default_capacity must be non-zero",
            });
        }

        if default_capacity > capacity_cap {
            return Err(PumpError::InvalidConfig {
                message: "default_capacity cannot be greater than capacity_cap",
            });
        }

        Ok(Self {
            capacity_cap,
            default_capacity,
            end_after_pump: true,
            error_flush: ErrorFlush::default(),
        })
    }

    /// Sets the capacity cap.
    ///
    /// Note: This does not validate the configuration. Use [`PumpConfig::validate`]
    /// to check if the configuration is valid.
    pub fn with_capacity_cap(mut self, size: usize) -> Self {
        self.capacity_cap = size;
        self
    }

    /// Sets the default capacity.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_default_capacity(mut self, size: usize) -> Self {
        self.default_capacity = size;
        self
    }

    /// Sets whether [`Sink::end`](crate::Sink::end) is called after the source closes.
    pub fn with_end_after_pump(mut self, end: bool) -> Self {
        self.end_after_pump = end;
        self
    }

    /// Sets the error flush policy.
    pub fn with_error_flush(mut self, policy: ErrorFlush) -> Self {
        self.error_flush = policy;
        self
    }

    /// Returns the capacity cap.
    pub fn capacity_cap(&self) -> usize {
        self.capacity_cap
    }

    /// Returns the default capacity.
    pub fn default_capacity(&self) -> usize {
        self.default_capacity
    }

    /// Returns whether the sink is ended after the pump.
    pub fn end_after_pump(&self) -> bool {
        self.end_after_pump
    }

    /// Returns the error flush policy.
    pub fn error_flush(&self) -> ErrorFlush {
        self.error_flush
    }

    /// Picks the accumulation buffer capacity for a source length hint.
    ///
    /// A hint of zero is treated like a missing hint: a zero-sized buffer
    /// could never hold a byte if the source turns out to produce data.
    pub fn capacity_for(&self, expected_length: Option<u64>) -> usize {
        match expected_length {
            Some(0) | None => self.default_capacity,
            Some(len) => usize::try_from(len)
                .map_or(self.capacity_cap, |len| len.min(self.capacity_cap)),
        }
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use pumprs::PumpConfig;
    ///
    /// let config = PumpConfig::default().with_default_capacity(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PumpError> {
        Self::new(self.capacity_cap, self.default_capacity).map(|_| ())
    }
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            capacity_cap: DEFAULT_CAPACITY_CAP,
            default_capacity: DEFAULT_CAPACITY,
            end_after_pump: true,
            error_flush: ErrorFlush::default(),
        }
    }
}

/// What to do with accumulated-but-unwritten bytes when the pump fails.
///
/// Only source failures and cancellation are affected. Once a sink write has
/// failed, nothing further is written to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorFlush {
    /// Drop buffered bytes.
    #[default]
    Discard,

    /// Write buffered bytes before surfacing the error.
    BestEffort,
}
