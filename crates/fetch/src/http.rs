//! Production [`Transport`] backed by `reqwest`'s blocking client.

use crate::error::{ErrorKind, Result};
use crate::{Body, Transport};
use exn::ResultExt;
use reqwest::blocking::Client;
use std::io::{self, Read};
use std::time::{Duration, Instant};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings applied to every request made by an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Covers the whole request, from connecting until the body has been
    /// read to the end. A read already in progress when the deadline passes
    /// may run up to one more `timeout` before it fails.
    pub timeout: Duration,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }
}

pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(options: &HttpOptions) -> Result<Self> {
        if options.insecure {
            tracing::warn!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure)
            .build()
            .or_raise(|| ErrorKind::Client)?;
        Ok(Self { client, timeout: options.timeout })
    }

    fn classify(err: &reqwest::Error, url: &str) -> ErrorKind {
        if err.is_builder() {
            ErrorKind::Request(url.to_string())
        } else if err.is_timeout() {
            ErrorKind::Timeout
        } else {
            ErrorKind::Network
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Body> {
        let deadline = Instant::now() + self.timeout;
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                let kind = Self::classify(&err, url);
                return Err(err).or_raise(|| kind);
            },
        };
        let status = response.status().as_u16();
        if let Some(kind) = ErrorKind::from_status(status) {
            exn::bail!(kind);
        }
        tracing::trace!(url, status, length = response.content_length(), "Response received");
        Ok(Box::new(DeadlineReader { inner: response, deadline }))
    }
}

/// reqwest only bounds the wait for headers and each individual read, so a
/// server trickling bytes could hold a body open indefinitely. Once the
/// deadline has passed every read fails with [`io::ErrorKind::TimedOut`].
struct DeadlineReader<R> {
    inner: R,
    deadline: Instant,
}

impl<R: Read> Read for DeadlineReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if Instant::now() >= self.deadline {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "request deadline exceeded"));
        }
        self.inner.read(buf)
    }
}
