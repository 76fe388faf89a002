//! TOML configuration file loading
//!
//! Supports `~/.config/wavstream/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct WavstreamConfigFile {
    /// Feed settings
    #[serde(default)]
    pub stream: StreamFileConfig,
}

/// Feed configuration
#[derive(Debug, Default, Deserialize)]
pub struct StreamFileConfig {
    /// Bytes per pushed frame (e.g. 640 = 20 ms of 16 kHz mono 16-bit)
    pub chunk_bytes: Option<usize>,

    /// Delay between pushes, in milliseconds
    pub pace_ms: Option<u64>,

    /// Stream identifier handed to the sink with every frame
    pub stream_id: Option<String>,

    /// Derive the pace from the file's byte rate instead of `pace_ms`
    pub realtime: Option<bool>,
}

/// Load the TOML config file from the standard path
///
/// Returns `WavstreamConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> WavstreamConfigFile {
    let Some(path) = config_file_path() else {
        return WavstreamConfigFile::default();
    };

    if !path.exists() {
        return WavstreamConfigFile::default();
    }

    match load_config_file_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            WavstreamConfigFile::default()
        }
    }
}

/// Load a TOML config file from an explicit path
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed
pub fn load_config_file_from(path: &Path) -> Result<WavstreamConfigFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Return the config file path: `~/.config/wavstream/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("wavstream").join("config.toml"))
}
