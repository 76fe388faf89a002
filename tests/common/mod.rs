//! Shared test utilities
#![allow(dead_code)]

use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;

use tempfile::TempDir;
use uuid::Uuid;
use wavstream::{FormatHeader, FrameSink, WavReader};

/// 16 kHz mono 16-bit PCM
pub const PCM_16K_MONO: FormatHeader = FormatHeader {
    format_tag: 1,
    channels: 1,
    samples_per_sec: 16_000,
    avg_bytes_per_sec: 32_000,
    block_align: 2,
    bits_per_sample: 16,
};

/// Encode a chunk: tag, little-endian size, body
pub fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend_from_slice(&u32::try_from(body.len()).unwrap().to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Encode a `fmt ` chunk with `extension` bytes after the 16-byte record
pub fn fmt_chunk(format: &FormatHeader, extension: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(16 + extension.len());
    body.extend_from_slice(&format.format_tag.to_le_bytes());
    body.extend_from_slice(&format.channels.to_le_bytes());
    body.extend_from_slice(&format.samples_per_sec.to_le_bytes());
    body.extend_from_slice(&format.avg_bytes_per_sec.to_le_bytes());
    body.extend_from_slice(&format.block_align.to_le_bytes());
    body.extend_from_slice(&format.bits_per_sample.to_le_bytes());
    body.extend_from_slice(extension);
    chunk(b"fmt ", &body)
}

/// Wrap chunks in a RIFF/WAVE container
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body_len: usize = chunks.iter().map(Vec::len).sum();
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&u32::try_from(body_len + 4).unwrap().to_le_bytes());
    out.extend_from_slice(b"WAVE");
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

/// Deterministic, non-repeating sample bytes
pub fn ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| u8::try_from(i * 7 % 251).unwrap()).collect()
}

/// Write bytes to a file in `dir`
pub fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("failed to write fixture");
    path
}

/// Write a WAV file with hound
pub fn hound_wav(dir: &TempDir, name: &str, spec: hound::WavSpec, samples: &[i32]) -> PathBuf {
    let path = dir.path().join(name);
    let mut writer = hound::WavWriter::create(&path, spec).expect("failed to create wav");
    for &s in samples {
        writer.write_sample(s).expect("failed to write sample");
    }
    writer.finalize().expect("failed to finalize wav");
    path
}

/// 16-bit mono at 16 kHz
pub const fn speech_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Sine-ish test signal in 16-bit range
pub fn tone(len: usize) -> Vec<i32> {
    (0..len)
        .map(|i| {
            let i = i32::try_from(i).unwrap();
            (i * 613) % 30_000 - 15_000
        })
        .collect()
}

/// Little-endian bytes of 16-bit samples
pub fn i16_bytes(samples: &[i32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| i16::try_from(s).unwrap().to_le_bytes())
        .collect()
}

/// Read everything with a fixed buffer size, concatenating non-empty reads
pub fn drain<R: std::io::Read>(reader: &mut WavReader<R>, k: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; k];
    loop {
        let n = reader.read(&mut buf);
        if n == 0 {
            return out;
        }
        assert!(n <= k);
        out.extend_from_slice(&buf[..n]);
    }
}

/// In-memory source whose reads fail once the cursor reaches `limit`
pub struct FailAfter {
    inner: Cursor<Vec<u8>>,
    limit: u64,
}

impl FailAfter {
    pub fn new(bytes: Vec<u8>, limit: usize) -> Self {
        Self {
            inner: Cursor::new(bytes),
            limit: u64::try_from(limit).unwrap(),
        }
    }
}

impl Read for FailAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.inner.position() >= self.limit {
            return Err(io::Error::other("device unplugged"));
        }
        self.inner.read(buf)
    }
}

impl Seek for FailAfter {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

/// Sink that keeps every frame
#[derive(Default)]
pub struct RecordingSink {
    pub frames: Vec<(Uuid, Vec<u8>)>,
    pub finished: bool,
}

impl RecordingSink {
    pub fn bytes(&self) -> Vec<u8> {
        self.frames
            .iter()
            .flat_map(|(_, f)| f.iter().copied())
            .collect()
    }
}

impl FrameSink for RecordingSink {
    fn push(&mut self, stream_id: &Uuid, frame: &[u8]) -> wavstream::Result<usize> {
        self.frames.push((*stream_id, frame.to_vec()));
        Ok(frame.len())
    }

    fn finish(&mut self) -> wavstream::Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Sink that fails once it has accepted `accept` frames
pub struct FailingSink {
    pub accept: usize,
    pub pushed: usize,
    pub finished: bool,
}

impl FailingSink {
    pub const fn new(accept: usize) -> Self {
        Self {
            accept,
            pushed: 0,
            finished: false,
        }
    }
}

impl FrameSink for FailingSink {
    fn push(&mut self, _: &Uuid, frame: &[u8]) -> wavstream::Result<usize> {
        if self.pushed == self.accept {
            return Err(wavstream::Error::Sink("stream closed by peer".to_string()));
        }
        self.pushed += 1;
        Ok(frame.len())
    }

    fn finish(&mut self) -> wavstream::Result<()> {
        self.finished = true;
        Ok(())
    }
}
