use crate::Compression;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

impl Compression {
    /// Detect compression from the suffix of a URL's path.
    ///
    /// The query string and fragment are ignored, so
    /// `https://example.com/sitemap-1.xml.gz?v=2` is still gzip.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url).as_bytes();
        let suffix = Compression::Gzip.extension().as_bytes();
        match path.len() >= suffix.len() && path[path.len() - suffix.len()..].eq_ignore_ascii_case(suffix) {
            true => Compression::Gzip,
            false => Compression::None,
        }
    }

    /// Detect compression format from magic bytes.
    ///
    /// Returns the `None` variant if the input doesn't start with a known
    /// signature (including input too short to tell).
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            return Compression::Gzip;
        }
        Compression::None
    }

    /// Decide how to read a document downloaded from `url`, given the first
    /// bytes of the downloaded file.
    ///
    /// The URL suffix is trusted when the bytes agree with it. When they
    /// don't (a `.gz` URL served already decompressed, or gzip served under
    /// a `.xml` name) the bytes win.
    #[must_use]
    pub fn detect(url: &str, head: &[u8]) -> Self {
        let declared = Self::from_url(url);
        if declared.check_magic_bytes(head) {
            return declared;
        }
        let actual = Self::from_magic_bytes(head);
        tracing::debug!(url, declared = %declared, actual = %actual, "Payload compression differs from URL suffix");
        actual
    }
}
