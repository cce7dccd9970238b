//! Error types.

use thiserror::Error;

/// Result alias for dump parsing operations.
pub type Result<T> = std::result::Result<T, DumpError>;

/// Fatal errors returned by dump parsing entry points.
///
/// Problems with the *content* of a dump never surface here; they are
/// collected as [`Anomaly`](crate::Anomaly) entries on the parsed
/// [`Document`](crate::Document).
#[derive(Debug, Error)]
pub enum DumpError {
    /// Reading the dump from a reader or file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The invocation itself is invalid (non-UTF-8 input, bad options).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl DumpError {
    /// Returns `true` if this is an [`InvalidArgument`](Self::InvalidArgument) error.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
