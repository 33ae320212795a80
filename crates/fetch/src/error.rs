//! Fetch Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.
//!
//! [`ErrorKind::is_retryable`] is load-bearing here: the retry loop in
//! [`RetryPolicy::run`](crate::RetryPolicy::run) uses it to decide whether
//! another attempt is worth making.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTTP client could not be constructed (TLS backend, bad user agent).
    #[display("failed to build HTTP client")]
    Client,
    /// The request could not be built, usually an invalid URL.
    #[display("invalid request: {_0}")]
    Request(#[error(not(source))] String),
    /// Connection failure, or the body stream broke mid-transfer.
    #[display("network error")]
    Network,
    /// The request did not complete within the configured timeout.
    #[display("request timed out")]
    Timeout,
    /// HTTP 429.
    #[display("too many requests")]
    TooManyRequests,
    /// HTTP 5xx.
    #[display("server error: HTTP {_0}")]
    ServerError(#[error(not(source))] u16),
    /// Any other non-success HTTP status. Asking again won't change the answer.
    #[display("unexpected status: HTTP {_0}")]
    Status(#[error(not(source))] u16),
    /// Every attempt failed with a retryable error.
    #[display("giving up after {_0} attempts")]
    RetriesExhausted(#[error(not(source))] u32),
    /// Creating, writing or renaming a local file failed.
    #[display("filesystem error: {}", _0.display())]
    Filesystem(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::TooManyRequests | Self::ServerError(_))
    }

    /// Map an HTTP status code to an error, or `None` for success.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            429 => Some(Self::TooManyRequests),
            500..=599 => Some(Self::ServerError(status)),
            _ => Some(Self::Status(status)),
        }
    }
}
