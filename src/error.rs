//! Error types for fastaslice

use thiserror::Error;

/// Result type alias for fastaslice operations
pub type Result<T> = std::result::Result<T, FastaSliceError>;

/// Error types that can occur in fastaslice
#[derive(Debug, Error)]
pub enum FastaSliceError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bytes do not have the expected shape
    ///
    /// Raised when a header line has no terminating newline within the
    /// bounded resolution window, or when a persisted index artifact does
    /// not decode into whole boundary pairs. Fatal for the affected window
    /// or partition only; sibling units are unaffected.
    #[error("Malformed input: {msg}")]
    MalformedInput {
        /// Error message
        msg: String,
    },

    /// Invalid range or caller contract violation
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Network error
    #[cfg(feature = "network")]
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error
    #[cfg(feature = "network")]
    #[error("HTTP error {status}: {url}")]
    Http {
        /// HTTP status code
        status: u16,
        /// URL that failed
        url: String,
    },

    /// Network timeout
    #[cfg(feature = "network")]
    #[error("Network timeout after {seconds}s: {url}")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
        /// URL that timed out
        url: String,
    },
}
