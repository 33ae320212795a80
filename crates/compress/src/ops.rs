//! Compression Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use flate2::{Compression as GzCompression, read::GzDecoder, write::GzEncoder};
use std::io::{Read, Write};
use tracing::instrument;

impl Compression {
    /// Compress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemapped_compress::Compression;
    ///
    /// let xml = b"<urlset></urlset>";
    /// let compressed = Compression::Gzip.compress(xml).unwrap();
    /// assert_eq!(Compression::from_magic_bytes(&compressed), Compression::Gzip);
    /// ```
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(input.to_vec()),
            Compression::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), GzCompression::default());
                encoder.write_all(input).or_raise(|| ErrorKind::Io)?;
                encoder.finish().or_raise(|| ErrorKind::Io)
            },
        }
    }

    /// Decompress a byte slice in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemapped_compress::Compression;
    ///
    /// let original = b"<urlset></urlset>";
    /// let compressed = Compression::Gzip.compress(original).unwrap();
    /// assert_eq!(Compression::Gzip.decompress(&compressed).unwrap(), original);
    /// ```
    #[instrument(skip(input), fields(format = %self, input_size = input.len(), output_size))]
    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.wrap_reader(input)?.read_to_end(&mut output).or_raise(|| ErrorKind::InvalidData)?;
        tracing::Span::current().record("output_size", output.len());
        Ok(output)
    }

    /// Wrap a reader with the matching decompression layer.
    ///
    /// The returned reader owns `reader`; dropping it closes the
    /// decompressor first and the underlying reader second.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{Cursor, Read};
    /// use sitemapped_compress::Compression;
    ///
    /// let compressed = Compression::Gzip.compress(b"<urlset/>").unwrap();
    /// let mut reader = Compression::Gzip.wrap_reader(Cursor::new(compressed)).unwrap();
    /// let mut xml = String::new();
    /// reader.read_to_string(&mut xml).unwrap();
    /// assert_eq!(xml, "<urlset/>");
    /// ```
    pub fn wrap_reader<'a, R: Read + 'a>(&self, reader: R) -> Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => Box::new(reader),
            Compression::Gzip => Box::new(GzDecoder::new(reader)),
        })
    }
}
