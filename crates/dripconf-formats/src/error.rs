//! Error types for dripconf-formats

use std::path::PathBuf;

use crate::format::Format;

/// Result type for dripconf-formats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or parsing configuration text
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    Parse { format: Format, message: String },

    #[error("Failed to parse {format} content at line {line}: {message}")]
    ParseAt {
        format: Format,
        line: usize,
        message: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn parse(format: Format, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    pub fn parse_at(format: Format, line: usize, message: impl Into<String>) -> Self {
        Self::ParseAt {
            format,
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The format whose parser rejected the input, if this is a parse error.
    pub fn format(&self) -> Option<Format> {
        match self {
            Self::Parse { format, .. } | Self::ParseAt { format, .. } => Some(*format),
            Self::Io { .. } => None,
        }
    }
}
