//! Error types for wavstream

use thiserror::Error;

/// Result type alias for wavstream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening, parsing or feeding a WAV file
#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller input: empty path, unopenable file, zero chunk size
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// RIFF/WAVE/fmt tag mismatch, or an I/O failure inside the header region
    #[error("malformed header: {reason}")]
    MalformedHeader {
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// No `data` chunk within the one-chunk lookahead after `fmt `
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// Source ended where sample data should begin
    #[error("unexpected end of file, before any audio data can be read")]
    PrematureEnd,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Frame sink rejected a push
    #[error("sink error: {0}")]
    Sink(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            reason: reason.into(),
            source: None,
        }
    }

    /// Low-level read/seek failure while parsing the header
    pub(crate) fn header_io(source: std::io::Error) -> Self {
        Self::MalformedHeader {
            reason: "unexpected end of file or error when reading audio file".to_string(),
            source: Some(source),
        }
    }
}
