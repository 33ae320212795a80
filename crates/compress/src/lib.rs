//! Transparent decompression for cached sitemap payloads.
//!
//! Sitemaps are published either as plain XML or gzip-compressed (usually
//! with a `.gz` suffix on the URL). This crate decides which one a cached
//! file is and wraps a reader accordingly:
//!
//! - **Detection** from the URL ([`Compression::from_url`]), magic bytes
//!   ([`Compression::from_magic_bytes`]), or a cross-check of the URL against
//!   the bytes actually downloaded ([`Compression::detect`])
//! - **Streaming** decompression via [`Compression::wrap_reader`]
//! - **Peek-decide-stream** via [`PeekableReader`]: decompress just enough
//!   to sniff the document type, then hand the whole stream to a parser
//!
//! In-memory [`Compression::compress`]/[`Compression::decompress`] exist
//! mostly so tests can build gzip fixtures.

mod construct;
pub mod error;
mod ops;
mod peekable;
mod util;

pub use crate::peekable::PeekableReader;

/// Compression applied to a downloaded document.
///
/// Defaults to [`None`](Self::None) (plain XML).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Gzip compression (.gz)
    Gzip,
}
