//! Turning a sitemap (or sitemap index) URL into page URLs.

use crate::classify::{PREFIX_LEN, classify};
use crate::decode::{IndexEntry, UrlEntry, decode_index, decode_leaf};
use crate::error::{ErrorKind, Result};
use crate::{Document, ErrorPolicy};
use exn::ResultExt;
use sitemapped_cache::{Cache, Options};
use sitemapped_compress::{Compression, PeekableReader};
use sitemapped_fetch::Transport;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Counts from one [`Resolver::resolve`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Leaf sitemaps decoded (1 when the root URL is itself a leaf).
    pub sitemaps: usize,
    /// Page URLs written to the output.
    pub urls: usize,
    /// Index entries skipped: empty `<loc>`, or failures under
    /// [`ErrorPolicy::Skip`].
    pub skipped: usize,
}

/// A decoded root document.
enum Decoded {
    Index(Vec<IndexEntry>),
    Leaf(Vec<UrlEntry>),
}

impl Decoded {
    fn decode<R: BufRead>(document: Document, input: R) -> Result<Self> {
        Ok(match document {
            Document::Index => Self::Index(decode_index(input)?),
            Document::Leaf => Self::Leaf(decode_leaf(input)?),
        })
    }
}

/// Resolves one level of sitemap index into page URLs, fetching every
/// document through the [`Cache`].
pub struct Resolver<'a, T> {
    cache: &'a Cache<T>,
    force: bool,
    policy: ErrorPolicy,
}

impl<'a, T: Transport> Resolver<'a, T> {
    pub fn new(cache: &'a Cache<T>) -> Self {
        Self { cache, force: false, policy: ErrorPolicy::default() }
    }

    /// Download every document again, even if it's already cached.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Write every page URL reachable from `url` to `output`, one per line.
    ///
    /// A leaf sitemap's URLs are written in document order. For an index,
    /// each listed sitemap is fetched and written in turn, in index order.
    /// Indexes listed inside an index are not followed.
    ///
    /// Failing to fetch `url` itself, or to write to `output`, is always an
    /// error. A failing index entry is an error under [`ErrorPolicy::Abort`]
    /// and a warning under [`ErrorPolicy::Skip`]. Lines already written are
    /// not taken back.
    #[instrument(skip(self, output), fields(force = self.force, policy = %self.policy))]
    pub fn resolve<W: Write>(&self, url: &str, output: &mut W) -> Result<Summary> {
        let path = self.fetch(url)?;
        let mut summary = Summary::default();
        match self.decode_root(url, &path)? {
            Decoded::Leaf(urls) => {
                summary.sitemaps += 1;
                emit(&urls, output, &mut summary)?;
            },
            Decoded::Index(entries) => {
                tracing::debug!(sitemaps = entries.len(), "Resolving sitemap index");
                for (position, entry) in entries.iter().enumerate() {
                    if entry.loc.is_empty() {
                        tracing::warn!(position, "Skipping index entry without a <loc>");
                        summary.skipped += 1;
                        continue;
                    }
                    match self.resolve_entry(&entry.loc) {
                        Ok(urls) => {
                            summary.sitemaps += 1;
                            emit(&urls, output, &mut summary)?;
                        },
                        Err(err) => match self.policy {
                            ErrorPolicy::Abort => return Err(err),
                            ErrorPolicy::Skip => {
                                tracing::warn!(loc = %entry.loc, "{err:?}");
                                summary.skipped += 1;
                            },
                        },
                    }
                }
            },
        }
        Ok(summary)
    }

    fn fetch(&self, url: &str) -> Result<PathBuf> {
        let options = Options::new().force(self.force);
        self.cache.resolve(url, &options).or_raise(|| ErrorKind::Fetch(url.to_string()))
    }

    /// Classify from the decompressed prefix, then decode. If the guess was
    /// wrong the root element gives it away, and the other decoder gets a go.
    fn decode_root(&self, url: &str, path: &Path) -> Result<Decoded> {
        let (compression, reader) = open_document(url, path)?;
        let mut reader = PeekableReader::new(reader);
        let guess = classify(reader.peek(PREFIX_LEN).or_raise(|| match compression {
            Compression::Gzip => ErrorKind::Decompress,
            Compression::None => ErrorKind::Read(path.to_path_buf()),
        })?);
        tracing::debug!(url, %compression, document = %guess, "Classified");
        let err = match Decoded::decode(guess, BufReader::new(reader.into_reader())) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => err,
        };
        if !matches!(*err, ErrorKind::UnexpectedRoot { .. }) {
            return Err(err);
        }
        let actual = guess.other();
        tracing::warn!(url, guessed = %guess, "Document misclassified, decoding as {actual}");
        let (_, reader) = open_document(url, path)?;
        Decoded::decode(actual, BufReader::new(reader))
    }

    #[instrument(skip(self))]
    fn resolve_entry(&self, loc: &str) -> Result<Vec<UrlEntry>> {
        let entry = || ErrorKind::Entry(loc.to_string());
        let path = self.fetch(loc).or_raise(entry)?;
        let (_, reader) = open_document(loc, &path).or_raise(entry)?;
        // Dropping the decoder closes the decompressor, then the file.
        let urls = decode_leaf(BufReader::new(reader)).or_raise(entry)?;
        tracing::debug!(urls = urls.len(), "Decoded sitemap");
        Ok(urls)
    }
}

/// Open a cached document, with a decompression layer if it needs one.
fn open_document(url: &str, path: &Path) -> Result<(Compression, Box<dyn Read>)> {
    let file = File::open(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let mut file = BufReader::new(file);
    let head = file.fill_buf().or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let compression = Compression::detect(url, head);
    let reader = compression.wrap_reader(file).or_raise(|| ErrorKind::Decompress)?;
    Ok((compression, reader))
}

fn emit<W: Write>(urls: &[UrlEntry], output: &mut W, summary: &mut Summary) -> Result<()> {
    for url in urls {
        if url.loc.is_empty() {
            tracing::warn!("Skipping <url> without a <loc>");
            continue;
        }
        writeln!(output, "{}", url.loc).or_raise(|| ErrorKind::Output)?;
        summary.urls += 1;
    }
    Ok(())
}
