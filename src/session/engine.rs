//! Core pump engine - PumpSession state machine.
//!
//! A session moves bytes from one [`Source`] to one [`Sink`] through an
//! accumulation buffer. The batching rule is the whole point:
//!
//! - chunks that arrive synchronously are gathered until the buffer fills
//! - a chunk that required a real suspension is flushed right away
//!
//! so a source with data at hand is drained in few large writes, while a
//! trickling source never has its bytes held back waiting for more.
//!
//! # Example
//!
//! ```
//! use pumprs::{IterSource, MemorySink, PumpConfig, PumpSession, PumpState};
//!
//! # tokio_test::block_on(async {
//! let mut session = PumpSession::new(PumpConfig::new(8, 8)?)?;
//! let mut source = IterSource::new(vec![&b"0123"[..], b"4567", b"89"]);
//! let mut sink = MemorySink::new();
//!
//! let total = session.run(&mut source, &mut sink).await?;
//! assert_eq!(total, 10);
//! assert_eq!(sink.write_sizes(), &[8, 2]);
//! assert_eq!(session.state(), PumpState::Done);
//! # Ok::<(), pumprs::PumpError>(())
//! # }).unwrap();
//! ```

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use super::PumpState;
use crate::buffer::{AccumulationBuffer, Append, BufferPool, WritePlan};
use crate::config::{ErrorFlush, PumpConfig};
use crate::error::PumpError;
use crate::sink::Sink;
use crate::source::{Pull, Source};

/// Runs a single pump from `source` into `sink`.
///
/// Returns the number of bytes delivered. The config is validated before
/// the first pull.
///
/// # Errors
///
/// See [`PumpSession::run`].
pub async fn pump<S, K>(
    mut source: S,
    mut sink: K,
    config: PumpConfig,
) -> Result<u64, PumpError>
where
    S: Source,
    K: Sink,
{
    PumpSession::new(config)?.run(&mut source, &mut sink).await
}

/// One transfer from a source to a sink.
///
/// A session runs at most once. It keeps its counters and final state
/// after the run so callers can inspect what happened.
#[derive(Debug)]
pub struct PumpSession {
    config: PumpConfig,
    state: PumpState,
    started: bool,
    bytes_delivered: u64,
    writes_issued: u64,
    cancellation: Option<CancellationToken>,
    pool: Option<BufferPool>,
}

/// Bookkeeping for the current run that does not outlive it.
#[derive(Debug, Default)]
struct Progress {
    /// Chunk handed over by the last pull, waiting to be appended.
    pending: Option<Bytes>,
    /// Whether that pull resolved without suspending.
    synchronous: bool,
    /// The source reported end of stream.
    closed: bool,
    /// Bytes produced by the source so far.
    produced: u64,
    /// The length hint has already been reported as exceeded.
    overrun_reported: bool,
}

impl PumpSession {
    /// Creates a session with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PumpError::InvalidConfig`] if the config does not validate.
    pub fn new(config: PumpConfig) -> Result<Self, PumpError> {
        config.validate()?;
        Ok(Self {
            config,
            state: PumpState::Reading,
            started: false,
            bytes_delivered: 0,
            writes_issued: 0,
            cancellation: None,
            pool: None,
        })
    }

    /// Observes `token` at the start of every read and after every write.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Takes the accumulation buffer from `pool` and returns it there afterwards.
    pub fn with_pool(mut self, pool: BufferPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Returns the current state.
    pub fn state(&self) -> PumpState {
        self.state
    }

    /// Returns the number of bytes the sink has accepted.
    pub fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered
    }

    /// Returns the number of writes (scalar or vectored) issued to the sink.
    pub fn writes_issued(&self) -> u64 {
        self.writes_issued
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &PumpConfig {
        &self.config
    }

    /// Pumps every chunk of `source` into `sink`.
    ///
    /// On success the sink has received exactly the bytes the source
    /// produced, in order, and has been ended unless
    /// [`PumpConfig::with_end_after_pump`] disabled it.
    ///
    /// On failure [`Sink::abort`] is called unless the sink itself failed,
    /// and [`Source::cancel`] is called unless the source itself failed.
    ///
    /// # Errors
    ///
    /// - [`PumpError::SessionFinished`] if the session already ran
    /// - [`PumpError::Source`] if a pull failed
    /// - [`PumpError::SinkWrite`] if a write or the final `end` failed
    /// - [`PumpError::Cancelled`] if the cancellation token fired
    pub async fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> Result<u64, PumpError>
    where
        S: Source + ?Sized,
        K: Sink + ?Sized,
    {
        if self.started {
            return Err(PumpError::SessionFinished);
        }
        self.started = true;
        self.state = PumpState::Reading;

        let expected_length = source.expected_length();
        let capacity = self.config.capacity_for(expected_length);
        let mut buffer = match &self.pool {
            Some(pool) => AccumulationBuffer::from_pool(pool, capacity),
            None => AccumulationBuffer::new(capacity),
        };
        tracing::debug!(capacity, ?expected_length, "pump started");

        let mut progress = Progress::default();
        let result = self
            .drive(source, sink, &mut buffer, &mut progress, expected_length)
            .await;

        match result {
            Ok(()) => {
                self.state = PumpState::Done;
                tracing::debug!(
                    bytes = self.bytes_delivered,
                    writes = self.writes_issued,
                    "pump finished"
                );
                Ok(self.bytes_delivered)
            }
            Err(err) => {
                self.fail(source, sink, &mut buffer, &err).await;
                Err(err)
            }
        }
    }

    async fn drive<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        buffer: &mut AccumulationBuffer,
        progress: &mut Progress,
        expected_length: Option<u64>,
    ) -> Result<(), PumpError>
    where
        S: Source + ?Sized,
        K: Sink + ?Sized,
    {
        loop {
            match self.state {
                PumpState::Reading => {
                    self.check_cancelled()?;

                    let (result, synchronous) = match source.pull() {
                        Pull::Ready(result) => (result, true),
                        Pull::Pending(fut) => (fut.await, false),
                    };
                    progress.synchronous = synchronous;

                    match result.map_err(PumpError::Source)? {
                        Some(chunk) => {
                            progress.produced += chunk.len() as u64;
                            Self::check_overrun(progress, expected_length);
                            progress.pending = Some(chunk.into_data());
                            self.state = PumpState::Accumulating;
                        }
                        None => {
                            progress.closed = true;
                            if let Some(expected) = expected_length {
                                if progress.produced < expected {
                                    tracing::debug!(
                                        expected,
                                        produced = progress.produced,
                                        "source closed short of its length hint"
                                    );
                                }
                            }
                            self.state = PumpState::Flushing;
                        }
                    }
                }

                PumpState::Accumulating => {
                    // A leftover always goes in before anything new.
                    let chunk = match buffer.take_leftover() {
                        Some(leftover) => leftover,
                        None => progress.pending.take().unwrap_or_default(),
                    };

                    self.state = match buffer.append(chunk) {
                        Append::Buffered if progress.synchronous => PumpState::Reading,
                        Append::Buffered | Append::Full => PumpState::Flushing,
                    };
                }

                PumpState::Flushing => {
                    if self.flush(sink, buffer).await? {
                        self.check_cancelled()?;
                    }

                    self.state = if buffer.has_leftover() {
                        PumpState::Accumulating
                    } else if progress.closed {
                        PumpState::Closing
                    } else {
                        PumpState::Reading
                    };
                }

                PumpState::Closing => {
                    if self.config.end_after_pump() {
                        sink.end().await.map_err(PumpError::SinkWrite)?;
                    }
                    return Ok(());
                }

                PumpState::Done | PumpState::Failed => return Ok(()),
            }
        }
    }

    /// Writes the filled region, if any. Returns whether a write was issued.
    async fn flush<K>(
        &mut self,
        sink: &mut K,
        buffer: &mut AccumulationBuffer,
    ) -> Result<bool, PumpError>
    where
        K: Sink + ?Sized,
    {
        let Some(plan) = buffer.write_plan() else {
            return Ok(false);
        };

        let len = plan.len();
        let vectored = matches!(plan, WritePlan::Vectored(_));
        let result = match plan {
            WritePlan::Scalar(bytes) => sink.write(bytes).await,
            WritePlan::Vectored(pieces) => sink.write_vectored(&pieces).await,
        };
        result.map_err(PumpError::SinkWrite)?;

        buffer.commit();
        self.bytes_delivered += len as u64;
        self.writes_issued += 1;
        tracing::trace!(len, vectored, capacity = buffer.capacity(), "flushed");
        Ok(true)
    }

    /// Writes everything still held, leftover included, one capacity at a time.
    async fn drain<K>(
        &mut self,
        sink: &mut K,
        buffer: &mut AccumulationBuffer,
    ) -> Result<(), PumpError>
    where
        K: Sink + ?Sized,
    {
        loop {
            self.flush(sink, buffer).await?;
            match buffer.take_leftover() {
                Some(leftover) => {
                    buffer.append(leftover);
                }
                None => return Ok(()),
            }
        }
    }

    async fn fail<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        buffer: &mut AccumulationBuffer,
        err: &PumpError,
    ) where
        S: Source + ?Sized,
        K: Sink + ?Sized,
    {
        let failed_in = self.state;
        self.state = PumpState::Failed;

        let holding = !buffer.is_empty() || buffer.has_leftover();
        if holding && self.config.error_flush() == ErrorFlush::BestEffort && !err.is_sink() {
            if let Err(flush_err) = self.drain(sink, buffer).await {
                tracing::debug!(error = %flush_err, "best-effort flush failed");
            }
        }

        let dropped = buffer.discard();
        tracing::debug!(
            error = %err,
            state = %failed_in,
            delivered = self.bytes_delivered,
            dropped,
            "pump failed"
        );

        if !err.is_sink() {
            sink.abort(err);
        }
        if !err.is_source() {
            source.cancel(err);
        }
    }

    fn check_cancelled(&self) -> Result<(), PumpError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(PumpError::Cancelled),
            _ => Ok(()),
        }
    }

    fn check_overrun(progress: &mut Progress, expected_length: Option<u64>) {
        let Some(expected) = expected_length else {
            return;
        };
        if progress.produced > expected && !progress.overrun_reported {
            progress.overrun_reported = true;
            tracing::warn!(
                expected,
                produced = progress.produced,
                "source produced more bytes than its length hint"
            );
        }
    }
}
