//! RIFF chunk headers and the fixed `fmt ` record

use std::fmt;
use std::io::Read;
use std::time::Duration;

/// Container tag at offset 0
pub const RIFF: [u8; 4] = *b"RIFF";

/// Form type following the RIFF size
pub const WAVE: [u8; 4] = *b"WAVE";

/// Format sub-chunk tag
pub const FMT: [u8; 4] = *b"fmt ";

/// Sample data sub-chunk tag
pub const DATA: [u8; 4] = *b"data";

/// `format_tag` value for uncompressed integer PCM
pub const WAVE_FORMAT_PCM: u16 = 0x0001;

/// PCM stream description carried by the `fmt ` chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatHeader {
    /// Encoding type code (1 = PCM)
    pub format_tag: u16,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Sample rate in Hz
    pub samples_per_sec: u32,
    /// Average bytes per second, for buffer estimation
    pub avg_bytes_per_sec: u32,
    /// Bytes per sample frame
    pub block_align: u16,
    /// Bits per sample of a single channel
    pub bits_per_sample: u16,
}

impl FormatHeader {
    /// On-disk size of the record
    pub const SIZE: usize = 16;

    /// Decode the record, each field little-endian in declaration order
    #[must_use]
    pub const fn from_le_bytes(b: [u8; Self::SIZE]) -> Self {
        Self {
            format_tag: u16::from_le_bytes([b[0], b[1]]),
            channels: u16::from_le_bytes([b[2], b[3]]),
            samples_per_sec: u32::from_le_bytes([b[4], b[5], b[6], b[7]]),
            avg_bytes_per_sec: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
            block_align: u16::from_le_bytes([b[12], b[13]]),
            bits_per_sample: u16::from_le_bytes([b[14], b[15]]),
        }
    }

    /// Whether the stream is plain integer PCM
    #[must_use]
    pub const fn is_pcm(&self) -> bool {
        self.format_tag == WAVE_FORMAT_PCM
    }

    /// Playback time of `bytes` of audio
    ///
    /// Returns zero when the byte rate is unknown
    #[must_use]
    pub fn duration_of(&self, bytes: u64) -> Duration {
        if self.avg_bytes_per_sec == 0 {
            return Duration::ZERO;
        }
        let nanos = u128::from(bytes) * 1_000_000_000 / u128::from(self.avg_bytes_per_sec);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for FormatHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "format {:#06x}, {} ch, {} Hz, {} bit, {} B/frame, {} B/s",
            self.format_tag,
            self.channels,
            self.samples_per_sec,
            self.bits_per_sample,
            self.block_align,
            self.avg_bytes_per_sec
        )
    }
}

/// Sub-chunk header: 4-byte tag followed by a little-endian u32 size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    /// Read the next 8-byte chunk header
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, including `UnexpectedEof`
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<Self> {
        let mut raw = [0u8; 8];
        reader.read_exact(&mut raw)?;

        Ok(Self {
            tag: [raw[0], raw[1], raw[2], raw[3]],
            size: u32::from(raw[4])
                | (u32::from(raw[5]) << 8)
                | (u32::from(raw[6]) << 16)
                | (u32::from(raw[7]) << 24),
        })
    }
}

/// Printable form of a four-character code
pub(crate) fn fourcc(tag: &[u8; 4]) -> String {
    tag.escape_ascii().to_string()
}
