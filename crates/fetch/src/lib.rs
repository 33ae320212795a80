//! Fetching sitemap documents onto local disk.
//!
//! - [`Transport`] performs a single HTTP GET. [`HttpTransport`] is the
//!   real one; [`MockTransport`] (behind the `mock` feature) serves scripted
//!   replies for tests in other crates.
//! - [`RetryPolicy`] retries transient failures (network errors, timeouts,
//!   HTTP 429 and 5xx) with exponential backoff.
//! - [`Downloader`] combines the two and writes the body atomically: the
//!   destination path only ever holds a complete download.
//!
//! Everything here is blocking. One request is in flight at a time.

mod download;
pub mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod retry;

pub use crate::download::{Downloader, wip_path};
pub use crate::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpOptions, HttpTransport};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{MockTransport, Reply};
pub use crate::retry::RetryPolicy;
use std::io::Read;

/// Response body of a successful request.
pub type Body = Box<dyn Read>;

/// A single HTTP GET attempt.
///
/// Implementations return the body only for 2xx responses and map
/// everything else to an [`ErrorKind`](crate::error::ErrorKind) whose
/// [`is_retryable`](crate::error::ErrorKind::is_retryable) tells the
/// [`RetryPolicy`] whether to try again. Retrying is the caller's job.
pub trait Transport {
    fn get(&self, url: &str) -> error::Result<Body>;
}
