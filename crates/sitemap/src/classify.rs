//! Sniffing a document's kind from its first bytes.
//!
//! Not XML-aware: a document counts as an index when the marker appears
//! anywhere in its prefix, comments and attribute values included. The
//! resolver falls back to the other decoder when the root element disagrees.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use memchr::memmem;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected.
pub const PREFIX_LEN: usize = 1024;

const INDEX_MARKER: &[u8] = b"sitemapindex";

/// The two shapes of sitemap document.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Document {
    /// `<sitemapindex>`, listing other sitemaps.
    #[display("index")]
    Index,
    /// `<urlset>`, listing pages.
    #[display("leaf")]
    Leaf,
}

impl Document {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Index => Self::Leaf,
            Self::Leaf => Self::Index,
        }
    }

    /// Local name of the root element.
    #[must_use]
    pub fn root_element(self) -> &'static str {
        match self {
            Self::Index => "sitemapindex",
            Self::Leaf => "urlset",
        }
    }
}

/// Classify a document from (at most) its first [`PREFIX_LEN`] bytes.
///
/// ```
/// use sitemapped_sitemap::{Document, classify};
///
/// assert_eq!(classify(b"<sitemapindex><sitemap>"), Document::Index);
/// assert_eq!(classify(b"<urlset><url>"), Document::Leaf);
/// assert_eq!(classify(b""), Document::Leaf);
/// ```
#[must_use]
pub fn classify(prefix: &[u8]) -> Document {
    let prefix = &prefix[..prefix.len().min(PREFIX_LEN)];
    match memmem::find(prefix, INDEX_MARKER) {
        Some(_) => Document::Index,
        None => Document::Leaf,
    }
}

/// Classify the (uncompressed) file at `path`.
pub fn classify_path(path: &Path) -> Result<Document> {
    let file = File::open(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let mut prefix = Vec::with_capacity(PREFIX_LEN);
    file.take(PREFIX_LEN as u64)
        .read_to_end(&mut prefix)
        .or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    Ok(classify(&prefix))
}
