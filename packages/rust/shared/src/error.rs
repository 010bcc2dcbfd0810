//! Error types for the Help Center retrieval stack.
//!
//! Library crates use [`HelpCenterError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Help Center operations.
#[derive(Debug, thiserror::Error)]
pub enum HelpCenterError {
    /// The outbound call did not complete successfully: connection error,
    /// timeout, non-2xx status, or an undecodable response body.
    ///
    /// The transport error is carried unmodified; it is never retried.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Caller input that cannot be turned into an operation call.
    #[error("invalid input: {message}")]
    Validation { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HelpCenterError>;

impl HelpCenterError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from the remote call rather than the caller.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}
