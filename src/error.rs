//! Error Types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum WavSweepError {
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Conversion failed for {}: {source}", path.display())]
    Conversion { path: PathBuf, source: CodecError },

    #[error("Could not delete {}: {source}", path.display())]
    Deletion { path: PathBuf, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Processing error: {message}")]
    Processing { message: String },
}

impl WavSweepError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn processing<S: Into<String>>(msg: S) -> Self { Self::Processing { message: msg.into() } }

    pub fn conversion<P: Into<PathBuf>>(path: P, source: CodecError) -> Self {
        Self::Conversion { path: path.into(), source }
    }

    pub fn deletion<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Deletion { path: path.into(), source }
    }
}

/// Failures raised by the decode/encode collaborator for a single file
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported format: {0}")]
    Unsupported(String),

    #[error("corrupt input: {0}")]
    Corrupt(String),

    #[error("no decodable audio track")]
    NoTrack,

    #[error("stream contained no audio")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),
}

impl From<symphonia::core::errors::Error> for CodecError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error as SymphoniaError;

        match err {
            SymphoniaError::IoError(e) => Self::Io(e),
            SymphoniaError::Unsupported(msg) => Self::Unsupported(msg.to_string()),
            SymphoniaError::DecodeError(msg) => Self::Corrupt(msg.to_string()),
            SymphoniaError::LimitError(msg) => Self::Corrupt(format!("limit exceeded: {}", msg)),
            other => Self::Corrupt(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WavSweepError>;
