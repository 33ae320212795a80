//! Config Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An explicitly requested config file doesn't exist.
    #[display("config file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A config source couldn't be read or has values of the wrong type.
    #[display("failed to load configuration")]
    Load,
    /// Not a duration this crate understands.
    #[display("invalid duration {_0:?} (expected e.g. \"15\", \"15s\", \"500ms\", \"2m\")")]
    InvalidDuration(#[error(not(source))] String),
    /// A value that parsed fine but makes no sense.
    #[display("invalid value for `{_0}`")]
    InvalidValue(#[error(not(source))] &'static str),
}
