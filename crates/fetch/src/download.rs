//! Atomic downloads.
//!
//! The body is streamed into `<destination>.wip` and renamed onto the
//! destination only once it has been written completely. Readers of the
//! destination never see a partial file; an interrupted run leaves at most
//! an orphaned `.wip` file behind.

use crate::error::{ErrorKind, Result};
use crate::{RetryPolicy, Transport};
use exn::ResultExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::instrument;

const WIP_SUFFIX: &str = ".wip";
const CHUNK_SIZE: usize = 8192;

/// Path the body is streamed into before being renamed onto `destination`.
///
/// ```
/// use std::path::Path;
/// use sitemapped_fetch::wip_path;
///
/// assert_eq!(wip_path(Path::new("/cache/ab/abcdef")), Path::new("/cache/ab/abcdef.wip"));
/// ```
pub fn wip_path(destination: &Path) -> PathBuf {
    let mut wip = OsString::from(destination.as_os_str());
    wip.push(WIP_SUFFIX);
    PathBuf::from(wip)
}

/// Downloads URLs onto local paths, retrying transient failures.
pub struct Downloader<T> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Download `url` onto `destination`, replacing any previous file there.
    ///
    /// Returns the number of bytes written. The parent directory must
    /// already exist. Network failures are retried according to the
    /// [`RetryPolicy`]; local filesystem failures are not.
    #[instrument(skip(self, destination), fields(destination = %destination.display(), bytes))]
    pub fn fetch(&self, url: &str, destination: &Path) -> Result<u64> {
        let wip = wip_path(destination);
        let bytes = self.retry.run(|attempt| {
            tracing::debug!(attempt, "Requesting");
            self.attempt(url, &wip)
        })?;
        fs::rename(&wip, destination).or_raise(|| ErrorKind::Filesystem(destination.to_path_buf()))?;
        tracing::Span::current().record("bytes", bytes);
        tracing::debug!("Download complete");
        Ok(bytes)
    }

    fn attempt(&self, url: &str, wip: &Path) -> Result<u64> {
        let mut body = self.transport.get(url)?;
        // Truncates whatever a previous failed attempt left behind.
        let mut file = File::create(wip).or_raise(|| ErrorKind::Filesystem(wip.to_path_buf()))?;
        let mut buffer = vec![0; CHUNK_SIZE];
        let mut total: u64 = 0;
        loop {
            let read = match body.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    let kind = match err.kind() {
                        io::ErrorKind::TimedOut => ErrorKind::Timeout,
                        _ => ErrorKind::Network,
                    };
                    return Err(err).or_raise(|| kind);
                },
            };
            file.write_all(&buffer[..read]).or_raise(|| ErrorKind::Filesystem(wip.to_path_buf()))?;
            total += read as u64;
        }
        file.sync_all().or_raise(|| ErrorKind::Filesystem(wip.to_path_buf()))?;
        Ok(total)
    }
}
