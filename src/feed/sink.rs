//! Destinations for pushed audio frames

use std::io::Write;

use uuid::Uuid;

use crate::Result;

/// Receives sample frames for a stream, one push per frame
///
/// Mirrors the speech service boundary: `(stream id, buffer, length)` in,
/// number of bytes accepted out.
pub trait FrameSink {
    /// Push one frame of raw sample bytes
    ///
    /// # Errors
    ///
    /// Returns error if the sink can no longer accept data; the feed stops
    fn push(&mut self, stream_id: &Uuid, frame: &[u8]) -> Result<usize>;

    /// Called once after the last frame of a completed feed
    ///
    /// # Errors
    ///
    /// Returns error if buffered data cannot be delivered
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn push(&mut self, stream_id: &Uuid, frame: &[u8]) -> Result<usize> {
        (**self).push(stream_id, frame)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Writes raw frames to any byte writer (file, stdout, pipe)
///
/// The stream id is not written; output is the bare sample data.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
    bytes_written: u64,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Total bytes written so far
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for WriterSink<W> {
    fn push(&mut self, stream_id: &Uuid, frame: &[u8]) -> Result<usize> {
        self.writer.write_all(frame)?;
        self.bytes_written += frame.len() as u64;
        tracing::trace!(%stream_id, len = frame.len(), "frame written");
        Ok(frame.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
