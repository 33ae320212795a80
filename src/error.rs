//! Binary Error Types
//!
//! Each variant marks the stage of the run that failed. The cause is
//! attached underneath as an `exn` error tree.

use derive_more::{Display, Error};

/// A run error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for the binary.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("failed to set up HTTP client")]
    Client,
    #[display("failed to resolve {_0}")]
    Resolve(#[error(not(source))] String),
    #[display("failed to write to stdout")]
    Output,
}
