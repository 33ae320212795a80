use crate::Compression;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl Compression {
    /// Suffix a URL or file name carries when it holds this format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Gzip => ".gz",
        }
    }

    /// Short name for logs.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }

    /// Check that `bytes` look like this format.
    ///
    /// Used to cross-check a format guessed from a URL suffix against what
    /// the server actually sent. Plain XML has no magic, so
    /// [`None`](Compression::None) matches anything that isn't gzip.
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        Self::from_magic_bytes(bytes) == *self
    }
}
