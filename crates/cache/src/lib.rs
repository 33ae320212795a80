//! Content-addressed on-disk cache of downloaded documents.
//!
//! A URL's location in the cache is a pure function of the URL:
//! `<root>/<sha1[..2]>/<sha1>`, where `sha1` is the hex SHA-1 of the URL
//! string. What was downloaded doesn't matter; the same URL always lands in
//! the same place. Entries are never modified in place. A refresh downloads
//! to a temporary sibling and renames it over the old entry (see
//! [`Downloader`]).
//!
//! There is no expiry. An entry is fetched when it is missing or when the
//! caller asks for it with [`Options::force`].

pub mod error;
mod key;

pub use crate::key::digest;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use sitemapped_fetch::{Downloader, Transport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Per-lookup options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Store the entry as `<root>/<filename>` instead of under its digest.
    pub filename: Option<String>,
    /// Download again even if the entry exists.
    pub force: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// The cache: a root directory plus the [`Downloader`] that fills it.
///
/// # Examples
///
/// ```no_run
/// use sitemapped_cache::{Cache, Options};
/// use sitemapped_fetch::{Downloader, HttpOptions, HttpTransport, RetryPolicy};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(&HttpOptions::default()).map_err(|e| (*e).to_string())?;
/// let cache = Cache::new("/tmp/sitemap", Downloader::new(transport, RetryPolicy::default()));
/// let path = cache.resolve("https://example.com/sitemap.xml", &Options::new()).map_err(|e| (*e).to_string())?;
/// println!("{}", path.display());
/// # Ok(())
/// # }
/// ```
pub struct Cache<T> {
    root: PathBuf,
    downloader: Downloader<T>,
}

impl<T: Transport> Cache<T> {
    pub fn new(root: impl Into<PathBuf>, downloader: Downloader<T>) -> Self {
        Self { root: root.into(), downloader }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn downloader(&self) -> &Downloader<T> {
        &self.downloader
    }

    /// Where `url` is (or would be) stored. No side effects.
    pub fn path_for(&self, url: &str, options: &Options) -> Result<PathBuf> {
        match &options.filename {
            Some(filename) => key::named(&self.root, filename),
            None => Ok(key::sharded(&self.root, url)),
        }
    }

    /// Local path holding the document at `url`, downloading it first when
    /// it isn't cached yet or `options.force` is set.
    ///
    /// Creates the entry's directory (and parents) if needed. A failed
    /// download never leaves a partial file at the returned path.
    #[instrument(skip(self, options), fields(force = options.force))]
    pub fn resolve(&self, url: &str, options: &Options) -> Result<PathBuf> {
        let path = self.path_for(url, options)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).or_raise(|| ErrorKind::Filesystem(dir.to_path_buf()))?;
        }
        let cached = path.try_exists().or_raise(|| ErrorKind::Filesystem(path.clone()))?;
        if cached && !options.force {
            tracing::debug!(path = %path.display(), "Cache hit");
            return Ok(path);
        }
        tracing::debug!(path = %path.display(), cached, "Cache miss, downloading");
        self.downloader.fetch(url, &path).or_raise(|| ErrorKind::Download(url.to_string()))?;
        Ok(path)
    }
}
