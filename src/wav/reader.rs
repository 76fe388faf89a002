//! Bounded, poll-based reader over the `data` chunk of a WAV file
//!
//! Two error models live here on purpose. Construction (`open` /
//! `from_source`) validates the header and fails with a typed [`Error`].
//! Streaming ([`WavReader::read`]) never fails: it returns 0 both when the
//! data is exhausted and when the source errors, and keeps the error for
//! [`WavReader::last_error`].

use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use super::header::{ChunkHeader, DATA, FMT, FormatHeader, RIFF, WAVE, fourcc};
use crate::{Error, Result};

/// Declared `data` size used by streaming writers that never patch the header
pub const UNBOUNDED_DATA_LEN: u32 = u32::MAX;

/// `FormatHeader::SIZE` as a chunk size
const FMT_RECORD_LEN: u32 = 16;

/// Reads PCM bytes from a validated RIFF/WAVE source
#[derive(Debug)]
pub struct WavReader<R = BufReader<File>> {
    source: R,
    format: FormatHeader,
    data_len: u32,
    /// Bytes of the data chunk not yet served; `None` reads to end of source
    remaining: Option<u64>,
    last_error: Option<io::Error>,
}

impl WavReader {
    /// Open a WAV file and position the cursor at its first sample byte
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the path is empty or the file cannot be
    /// opened, otherwise any header validation error of [`WavReader::from_source`]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::invalid_argument("audio filename is empty"));
        }

        let file = File::open(path).map_err(|e| Error::InvalidArgument {
            reason: format!("failed to open audio file {}", path.display()),
            source: Some(e),
        })?;

        tracing::debug!(path = %path.display(), "opened audio file");
        Self::from_source(BufReader::new(file))
    }
}

impl<R: Read + Seek> WavReader<R> {
    /// Validate the header of `source` and position it at the sample data
    ///
    /// The source is dropped if validation fails.
    ///
    /// # Errors
    ///
    /// - `MalformedHeader` on a tag mismatch or any read/seek failure
    /// - `UnsupportedLayout` if `data` is not found within one skipped chunk
    /// - `PrematureEnd` if the source ends where non-empty data should start
    pub fn from_source(mut source: R) -> Result<Self> {
        let (format, data_len) = parse_header(&mut source)?;

        tracing::debug!(
            format_tag = format.format_tag,
            channels = format.channels,
            sample_rate = format.samples_per_sec,
            bits_per_sample = format.bits_per_sample,
            data_len,
            "wav header parsed"
        );

        Ok(Self {
            source,
            format,
            data_len,
            remaining: (data_len != UNBOUNDED_DATA_LEN).then_some(u64::from(data_len)),
            last_error: None,
        })
    }
}

impl<R: Read> WavReader<R> {
    /// Fill `buf` with up to `buf.len()` sample bytes
    ///
    /// Returns the number of bytes read. Fewer than requested means the data
    /// chunk ended. Returns 0 once the data is exhausted or after a read
    /// error, and on every later call.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let want = self
            .remaining
            .map_or(buf.len(), |r| usize::try_from(r).map_or(buf.len(), |r| r.min(buf.len())));

        let mut filled = 0;
        while filled < want {
            match self.source.read(&mut buf[filled..want]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!(error = %e, "audio read failed, closing stream");
                    self.last_error = Some(e);
                    self.remaining = Some(0);
                    return 0;
                }
            }
        }

        self.remaining = if filled < want {
            Some(0)
        } else {
            self.remaining.map(|r| r - filled as u64)
        };

        filled
    }
}

impl<R> WavReader<R> {
    /// Format record from the `fmt ` chunk
    #[must_use]
    pub const fn format(&self) -> &FormatHeader {
        &self.format
    }

    /// Declared size of the `data` chunk
    #[must_use]
    pub const fn data_len(&self) -> u32 {
        self.data_len
    }

    /// Playback time of the declared data, `None` for unbounded streams
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        (self.data_len != UNBOUNDED_DATA_LEN)
            .then(|| self.format.duration_of(u64::from(self.data_len)))
    }

    /// Error that ended the stream, if it did not end naturally
    #[must_use]
    pub const fn last_error(&self) -> Option<&io::Error> {
        self.last_error.as_ref()
    }

    /// Release the underlying source
    pub fn close(self) {
        drop(self.source);
        tracing::trace!("wav reader closed");
    }
}

fn parse_header<R: Read + Seek>(source: &mut R) -> Result<(FormatHeader, u32)> {
    let mut tag = [0u8; 4];

    source.read_exact(&mut tag).map_err(Error::header_io)?;
    if tag != RIFF {
        return Err(Error::malformed(format!(
            "tag 'RIFF' expected, found '{}'",
            fourcc(&tag)
        )));
    }

    // RIFF size is not checked against the real length
    let mut riff_size = [0u8; 4];
    source.read_exact(&mut riff_size).map_err(Error::header_io)?;

    source.read_exact(&mut tag).map_err(Error::header_io)?;
    if tag != WAVE {
        return Err(Error::malformed(format!(
            "tag 'WAVE' expected, found '{}'",
            fourcc(&tag)
        )));
    }

    let fmt = ChunkHeader::read_from(source).map_err(Error::header_io)?;
    if fmt.tag != FMT {
        return Err(Error::malformed(format!(
            "tag 'fmt ' expected, found '{}'",
            fourcc(&fmt.tag)
        )));
    }

    let mut record = [0u8; FormatHeader::SIZE];
    source.read_exact(&mut record).map_err(Error::header_io)?;
    let format = FormatHeader::from_le_bytes(record);

    // Extended fmt chunks (cbSize + extension) are skipped uninterpreted
    if fmt.size > FMT_RECORD_LEN {
        source
            .seek(SeekFrom::Current(i64::from(fmt.size - FMT_RECORD_LEN)))
            .map_err(Error::header_io)?;
    }

    let mut chunk = ChunkHeader::read_from(source).map_err(Error::header_io)?;
    if chunk.tag != DATA {
        tracing::debug!(
            tag = %fourcc(&chunk.tag),
            size = chunk.size,
            "skipping chunk before data"
        );
        source
            .seek(SeekFrom::Current(i64::from(chunk.size)))
            .map_err(Error::header_io)?;

        chunk = ChunkHeader::read_from(source).map_err(Error::header_io)?;
        if chunk.tag != DATA {
            return Err(Error::UnsupportedLayout(format!(
                "data chunk must directly follow the fmt chunk, found '{}'",
                fourcc(&chunk.tag)
            )));
        }
    }

    if chunk.size > 0 && at_end(source).map_err(Error::header_io)? {
        return Err(Error::PrematureEnd);
    }

    Ok((format, chunk.size))
}

/// Whether the cursor sits at (or past) the end of the source
fn at_end<S: Seek>(source: &mut S) -> io::Result<bool> {
    let pos = source.stream_position()?;
    let end = source.seek(SeekFrom::End(0))?;
    source.seek(SeekFrom::Start(pos))?;
    Ok(pos >= end)
}
