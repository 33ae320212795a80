//! Mapping URLs to cache locations.

use crate::error::{ErrorKind, Result};
use sha1::{Digest, Sha1};
use std::path::{Component, Path, PathBuf};

/// Number of leading hex characters of the digest used as the shard
/// directory name.
const SHARD_LEN: usize = 2;

/// Hex-encoded SHA-1 of the URL: the cache key.
///
/// ```
/// assert_eq!(sitemapped_cache::digest("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn digest(url: &str) -> String {
    hex::encode(Sha1::digest(url.as_bytes()))
}

/// `<root>/<digest[..2]>/<digest>`.
pub(crate) fn sharded(root: &Path, url: &str) -> PathBuf {
    let digest = digest(url);
    root.join(&digest[..SHARD_LEN]).join(&digest)
}

/// `<root>/<filename>`, provided `filename` is a single plain component.
///
/// Null bytes pass through [`Path::components`] on Unix but truncate the
/// name in syscalls, so they are rejected explicitly.
pub(crate) fn named(root: &Path, filename: &str) -> Result<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if !name.as_encoded_bytes().contains(&0) => Ok(root.join(name)),
        _ => exn::bail!(ErrorKind::InvalidFilename(filename.to_string())),
    }
}
