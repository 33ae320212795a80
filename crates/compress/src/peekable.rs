//! Peek-decide-stream over a (possibly compressed) document.
//!
//! Thin wrapper around [`Read::take`], [`Cursor`] and [`Chain`]: sniff the
//! first few decompressed bytes, then replay them in front of the rest.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::{Chain, Cursor, Read};

/// A [`Read`]er that can be inspected before being consumed.
///
/// Peek enough decompressed data to decide what kind of document it is,
/// then stream the whole thing (peeked bytes included) onward with
/// [`into_reader`](Self::into_reader).
///
/// ```
/// use std::io::{Cursor, Read};
/// use sitemapped_compress::{Compression, PeekableReader};
///
/// let xml = b"<sitemapindex><sitemap><loc>https://a.test/1.xml</loc></sitemap></sitemapindex>";
/// let compressed = Compression::Gzip.compress(xml).unwrap();
///
/// let mut peekable = PeekableReader::new(Compression::Gzip.wrap_reader(Cursor::new(compressed)).unwrap());
/// assert!(peekable.peek(1024).unwrap().starts_with(b"<sitemapindex>"));
///
/// let mut full = Vec::new();
/// peekable.into_reader().read_to_end(&mut full).unwrap();
/// assert_eq!(full, xml);
/// ```
pub struct PeekableReader<R> {
    decoder: R,
    buffer: Vec<u8>,
}

impl<R: Read> PeekableReader<R> {
    /// Wrap any reader for peeking.
    pub fn new(decoder: R) -> Self {
        Self { decoder, buffer: Vec::new() }
    }

    /// Read up to `limit` bytes of the decompressed content.
    ///
    /// Returns fewer than `limit` bytes only when the stream ends first.
    /// Calls don't accumulate: `peek(1024)` followed by `peek(16)` returns
    /// the first 16 bytes without reading anything more.
    pub fn peek(&mut self, limit: usize) -> Result<&[u8]> {
        if self.buffer.len() < limit {
            let needed = (limit - self.buffer.len()) as u64;
            (&mut self.decoder).take(needed).read_to_end(&mut self.buffer).or_raise(|| ErrorKind::InvalidData)?;
        }
        Ok(&self.buffer[..self.buffer.len().min(limit)])
    }

    /// Replay the peeked bytes, then continue with the rest of the stream.
    pub fn into_reader(self) -> Chain<Cursor<Vec<u8>>, R> {
        Cursor::new(self.buffer).chain(self.decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Compression;
    use rstest::rstest;

    fn peekable(format: Compression, input: Vec<u8>) -> PeekableReader<Box<dyn Read>> {
        PeekableReader::new(format.wrap_reader(Cursor::new(input)).unwrap())
    }

    fn document() -> Vec<u8> {
        b"<?xml version=\"1.0\"?>\n<urlset>\
          <url><loc>https://a.test/1</loc></url>\
          <url><loc>https://a.test/2</loc></url>\
          </urlset>"
            .to_vec()
    }

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Gzip)]
    fn test_peek(#[case] format: Compression) {
        let compressed = format.compress(&document()).unwrap();
        let mut peekable = peekable(format, compressed);
        assert_eq!(peekable.peek(5).unwrap(), b"<?xml");
    }

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Gzip)]
    fn test_peek_then_stream_everything(#[case] format: Compression) {
        let original = document();
        let compressed = format.compress(&original).unwrap();
        let mut peekable = peekable(format, compressed);
        peekable.peek(10).unwrap();
        let mut full = Vec::new();
        peekable.into_reader().read_to_end(&mut full).unwrap();
        assert_eq!(full, original);
    }

    #[test]
    fn test_peek_beyond_end() {
        let original = document();
        let mut peekable = PeekableReader::new(Cursor::new(original.clone()));
        assert_eq!(peekable.peek(1024).unwrap(), original.as_slice());
    }

    #[test]
    fn test_peek_shrinking_limit_reads_nothing_more() {
        let mut peekable = PeekableReader::new(Cursor::new(document()));
        assert_eq!(peekable.peek(12).unwrap().len(), 12);
        assert_eq!(peekable.peek(5).unwrap(), b"<?xml");
        assert_eq!(peekable.buffer.len(), 12);
    }

    #[test]
    fn test_peek_empty() {
        let mut peekable = PeekableReader::new(Cursor::new(Vec::new()));
        assert!(peekable.peek(1024).unwrap().is_empty());
    }

    #[test]
    fn test_peek_corrupt_gzip() {
        let mut peekable = peekable(Compression::Gzip, document());
        assert!(peekable.peek(16).is_err());
    }
}
