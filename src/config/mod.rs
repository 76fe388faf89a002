//! Configuration management for wavstream

pub mod file;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

use crate::{Error, Result};
use file::WavstreamConfigFile;

/// Default bytes per frame: 20 ms of 16 kHz mono 16-bit audio
pub const DEFAULT_CHUNK_BYTES: usize = 640;

/// Default delay between pushed frames
pub const DEFAULT_PACE: Duration = Duration::from_millis(20);

/// wavstream configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Feed configuration
    pub stream: StreamConfig,
}

/// How sample data is fed to a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Bytes per pushed frame
    pub chunk_bytes: usize,

    /// Delay between pushes
    pub pace: Duration,

    /// Identifier handed to the sink with every frame
    pub stream_id: Uuid,

    /// Pace frames by the playback time they cover
    pub realtime: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            pace: DEFAULT_PACE,
            stream_id: Uuid::nil(),
            realtime: false,
        }
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// With `config_path`, that file must exist and parse. Without it the
    /// standard path is tried and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit config file cannot be loaded, or if any
    /// setting holds an invalid value
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = match config_path {
            Some(path) => file::load_config_file_from(path)?,
            None => file::load_config_file(),
        };

        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a value cannot be parsed or is out of range
    pub fn from_sources<F>(fc: WavstreamConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StreamConfig::default();

        let chunk_bytes = parse_env(&env, "WAVSTREAM_CHUNK_BYTES")?
            .or(fc.stream.chunk_bytes)
            .unwrap_or(defaults.chunk_bytes);
        if chunk_bytes == 0 {
            return Err(Error::Config("chunk_bytes must be greater than zero".to_string()));
        }

        let pace = parse_env(&env, "WAVSTREAM_PACE_MS")?
            .or(fc.stream.pace_ms)
            .map_or(defaults.pace, Duration::from_millis);

        let stream_id = match env("WAVSTREAM_STREAM_ID").or(fc.stream.stream_id) {
            Some(raw) => Uuid::parse_str(raw.trim())
                .map_err(|e| Error::Config(format!("stream_id: invalid uuid '{raw}': {e}")))?,
            None => defaults.stream_id,
        };

        let realtime = match env("WAVSTREAM_REALTIME") {
            Some(raw) => parse_flag("WAVSTREAM_REALTIME", &raw)?,
            None => fc.stream.realtime.unwrap_or(defaults.realtime),
        };

        let stream = StreamConfig {
            chunk_bytes,
            pace,
            stream_id,
            realtime,
        };
        tracing::debug!(?stream, "resolved stream configuration");

        Ok(Self { stream })
    }
}

fn parse_env<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    env(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("{key}: invalid value '{raw}': {e}")))
        })
        .transpose()
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::Config(format!("{key}: invalid flag '{raw}'"))),
    }
}
