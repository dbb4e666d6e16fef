//! Core error types for diagram encoding and rendering
//!
//! Every fallible operation in the crate returns [`PumlError`]. Errors are
//! handed back to the immediate caller unchanged; nothing is retried or
//! swallowed internally.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PumlError>;

/// Errors raised while building, encoding or rendering a diagram
#[derive(Error, Debug)]
pub enum PumlError {
    #[error("Invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to read '{}': {source}", .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression error: {message}")]
    CompressionError { message: String },

    #[error("Decode error: {message}")]
    DecodeError { message: String },

    #[error("Network error requesting {url}: {message}")]
    NetworkError { url: String, message: String },

    #[error("Server responded with HTTP {status} for {url}")]
    HttpStatus {
        url: String,
        status: u16,
        body: Vec<u8>,
    },

    #[error("Unknown render kind: {kind}")]
    UnknownRenderKind { kind: String },
}

impl PumlError {
    /// Create a new invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a new file error for `path`
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileError {
            path: path.into(),
            source,
        }
    }

    /// Create a new compression error
    pub fn compression_error(message: impl Into<String>) -> Self {
        Self::CompressionError {
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode_error(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }

    /// Create a new network error for a request to `url`
    pub fn network_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkError {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code if this is an [`PumlError::HttpStatus`] error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
