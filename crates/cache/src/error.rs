//! Cache Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Creating a cache directory or checking for an entry failed.
    #[display("cache filesystem error: {}", _0.display())]
    Filesystem(#[error(not(source))] PathBuf),
    /// The entry was missing (or forced) and downloading it failed.
    #[display("failed to download {_0}")]
    Download(#[error(not(source))] String),
    /// A filename override isn't a single plain path component.
    #[display("invalid cache filename: {_0:?}")]
    InvalidFilename(#[error(not(source))] String),
}
