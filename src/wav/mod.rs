//! RIFF/WAVE container reading
//!
//! Supports the PCM subset: `RIFF`/`WAVE`, a `fmt ` chunk holding the 16-byte
//! format record (extensions skipped), then `data`, with at most one other
//! chunk tolerated in between.

mod header;
mod reader;

pub use header::{ChunkHeader, FormatHeader, WAVE_FORMAT_PCM};
pub use reader::{UNBOUNDED_DATA_LEN, WavReader};
