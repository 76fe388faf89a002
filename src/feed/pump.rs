//! Paced loop moving frames from a [`WavReader`] into a [`FrameSink`]

use std::future::Future;
use std::io::Read;
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};
use uuid::Uuid;

use super::FrameSink;
use crate::config::{DEFAULT_CHUNK_BYTES, DEFAULT_PACE, StreamConfig};
use crate::wav::{FormatHeader, WavReader};
use crate::{Error, Result};

/// Framing and pacing of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumpOptions {
    /// Identifier handed to the sink with every frame
    pub stream_id: Uuid,
    /// Maximum bytes per frame
    pub chunk_bytes: usize,
    /// Delay between pushes; zero disables pacing
    pub pace: Duration,
}

impl Default for PumpOptions {
    fn default() -> Self {
        Self {
            stream_id: Uuid::nil(),
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            pace: DEFAULT_PACE,
        }
    }
}

impl PumpOptions {
    /// Resolve options for a file, deriving the pace from its byte rate when
    /// `config.realtime` is set
    #[must_use]
    pub fn from_config(config: &StreamConfig, format: &FormatHeader) -> Self {
        let pace = if config.realtime {
            let per_chunk = format.duration_of(config.chunk_bytes as u64);
            if per_chunk.is_zero() {
                tracing::warn!(
                    avg_bytes_per_sec = format.avg_bytes_per_sec,
                    "byte rate unknown, falling back to configured pace"
                );
                config.pace
            } else {
                per_chunk
            }
        } else {
            config.pace
        };

        Self {
            stream_id: config.stream_id,
            chunk_bytes: config.chunk_bytes,
            pace,
        }
    }
}

/// Why a feed stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpOutcome {
    /// All sample data was delivered
    Exhausted,
    /// The reader closed the stream on a read error
    ReadError,
    /// The shutdown signal fired first
    Cancelled,
}

/// Summary of a finished feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpReport {
    /// Frames pushed to the sink
    pub frames: u64,
    /// Bytes accepted by the sink
    pub bytes: u64,
    /// Why the feed stopped
    pub outcome: PumpOutcome,
}

/// Feed the sample data of `reader` to `sink` until it is exhausted or
/// `shutdown` resolves
///
/// Frames go out at most every `options.pace`, the first one immediately.
/// The reader is closed on every exit path; the sink is finished only when
/// the feed ends without error.
///
/// Reads and pushes run inline on the calling task. They block, so keep
/// them small (one frame from a buffered local file) or run the whole feed
/// on a dedicated thread.
///
/// # Errors
///
/// Returns `InvalidArgument` for a zero `chunk_bytes`, or the first error
/// raised by the sink
pub async fn pump<R, S, F>(
    reader: WavReader<R>,
    sink: &mut S,
    options: &PumpOptions,
    shutdown: F,
) -> Result<PumpReport>
where
    R: Read,
    S: FrameSink + ?Sized,
    F: Future<Output = ()>,
{
    if options.chunk_bytes == 0 {
        reader.close();
        return Err(Error::invalid_argument("chunk size must be greater than zero"));
    }

    let mut reader = reader;
    let mut buf = vec![0u8; options.chunk_bytes];
    let mut ticker = pacer(options.pace);
    tokio::pin!(shutdown);

    tracing::debug!(
        stream_id = %options.stream_id,
        chunk_bytes = options.chunk_bytes,
        pace_ms = options.pace.as_millis(),
        "feed started"
    );

    let mut report = PumpReport {
        frames: 0,
        bytes: 0,
        outcome: PumpOutcome::Exhausted,
    };

    let result = loop {
        let cancelled = match ticker.as_mut() {
            Some(ticker) => tokio::select! {
                biased;
                () = &mut shutdown => true,
                _ = ticker.tick() => false,
            },
            None => tokio::select! {
                biased;
                () = &mut shutdown => true,
                () = tokio::task::yield_now() => false,
            },
        };
        if cancelled {
            report.outcome = PumpOutcome::Cancelled;
            break Ok(());
        }

        let n = reader.read(&mut buf);
        if n == 0 {
            if let Some(e) = reader.last_error() {
                tracing::warn!(error = %e, "feed stopped on read error");
                report.outcome = PumpOutcome::ReadError;
            }
            break Ok(());
        }

        match sink.push(&options.stream_id, &buf[..n]) {
            Ok(accepted) => {
                if accepted < n {
                    tracing::warn!(len = n, accepted, "sink accepted a partial frame");
                }
                report.frames += 1;
                report.bytes += accepted as u64;
            }
            Err(e) => break Err(e),
        }
    };

    reader.close();
    result?;
    sink.finish()?;

    tracing::info!(
        frames = report.frames,
        bytes = report.bytes,
        outcome = ?report.outcome,
        "feed finished"
    );

    Ok(report)
}

fn pacer(pace: Duration) -> Option<Interval> {
    if pace.is_zero() {
        return None;
    }

    let mut ticker = tokio::time::interval(pace);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Some(ticker)
}
