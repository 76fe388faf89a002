//! wavstream - Paced PCM streaming from RIFF/WAVE files
//!
//! This library provides:
//! - A validating RIFF/WAVE reader that exposes the `data` chunk as a
//!   bounded, poll-based byte stream
//! - A paced feed that pushes fixed-size frames into a sink
//! - Layered configuration for the feed
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  read(buf)  ┌──────────────┐  push(id, frame)  ┌──────────────┐
//! │  WavReader   │ ──────────▶ │     pump     │ ────────────────▶ │  FrameSink   │
//! │ RIFF/fmt/data│             │ chunk + pace │                   │ (STT stream) │
//! └──────────────┘             └──────────────┘                   └──────────────┘
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod wav;

pub use config::{Config, StreamConfig};
pub use error::{Error, Result};
pub use feed::{FrameSink, PumpOptions, PumpOutcome, PumpReport, WriterSink, pump};
pub use wav::{FormatHeader, WavReader};
