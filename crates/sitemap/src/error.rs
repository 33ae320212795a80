//! Sitemap Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A sitemap error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for sitemap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A cached document could not be opened or read.
    #[display("failed to read {}", _0.display())]
    Read(#[error(not(source))] PathBuf),
    /// The document isn't well-formed XML, or ends with elements still open.
    #[display("malformed XML")]
    Malformed,
    /// Well-formed, but the root element is for the other kind of document
    /// (or something else entirely).
    #[display("expected <{expected}> root element, found <{found}>")]
    UnexpectedRoot { expected: &'static str, found: String },
    /// The document has no root element at all.
    #[display("document has no root element")]
    MissingRoot,
    /// The document at this URL couldn't be downloaded into the cache.
    #[display("failed to fetch {_0}")]
    Fetch(#[error(not(source))] String),
    /// A compressed document couldn't be decompressed.
    #[display("failed to decompress document")]
    Decompress,
    /// A sitemap listed in an index couldn't be resolved.
    #[display("failed to resolve sitemap {_0}")]
    Entry(#[error(not(source))] String),
    /// Writing to the output failed.
    #[display("failed to write output")]
    Output,
}
