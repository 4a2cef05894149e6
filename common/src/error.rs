use std::path::PathBuf;

use thiserror::Error;

/// Errors shared by the capture, storage and playback crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The referenced recording file does not exist.
    #[error("recording not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The recording document is malformed or lacks a required field.
    #[error("invalid recording format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Reading or writing a recording failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single synthetic input call failed during playback.
    #[error("failed to inject input: {message}")]
    Injection { message: String },

    /// The platform input listener could not be attached.
    #[error("input capture error: {message}")]
    Capture { message: String },

    #[error("speed multiplier must be a positive number, got {0}")]
    InvalidSpeed(f64),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn injection(message: impl ToString) -> Self {
        Error::Injection {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
