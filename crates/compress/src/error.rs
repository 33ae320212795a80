//! Compression Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every crate in the workspace follows the same layout.

use derive_more::{Display, Error};

/// A compression error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for compression operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Data is corrupt or not in the expected format. Don't retry with the
    /// same input.
    #[display("invalid or corrupted data")]
    InvalidData,
    /// Writing compressed output failed.
    #[display("I/O error")]
    Io,
}
