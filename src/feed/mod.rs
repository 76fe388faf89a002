//! Feeding sample data to a downstream consumer
//!
//! Pulls fixed-size frames from a [`crate::wav::WavReader`] and pushes them,
//! paced, into a [`FrameSink`] such as a speech recognition stream.

mod pump;
mod sink;

pub use pump::{PumpOptions, PumpOutcome, PumpReport, pump};
pub use sink::{FrameSink, WriterSink};
