//! In-memory transport for testing.

use crate::error::{ErrorKind, Result};
use crate::{Body, Transport};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Cursor, Read};
use std::sync::{Mutex, MutexGuard};

/// One scripted response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// HTTP 200 with this body.
    Body(Vec<u8>),
    /// Any status code; non-2xx are mapped the same way the HTTP transport
    /// maps them.
    Status(u16),
    /// Connection failed before a response arrived.
    Network,
    /// The request timed out.
    Timeout,
    /// HTTP 200, but the connection drops after these bytes.
    Truncated(Vec<u8>),
}

#[derive(Default)]
struct Route {
    replies: VecDeque<Reply>,
    calls: usize,
}

/// Transport serving scripted replies per URL, counting every request.
///
/// Each URL has a queue of replies. Requests take from the front of the
/// queue until one reply is left, which is then repeated forever. URLs with
/// no replies get a 404.
///
/// # Examples
///
/// ```
/// use sitemapped_fetch::{MockTransport, Reply, Transport};
///
/// let transport = MockTransport::with_bodies([("https://a.test/sitemap.xml", "<urlset/>")]);
/// transport.enqueue("https://b.test/sitemap.xml", Reply::Status(429));
/// transport.enqueue("https://b.test/sitemap.xml", Reply::Body(b"<urlset/>".to_vec()));
///
/// assert!(transport.get("https://a.test/sitemap.xml").is_ok());
/// assert!(transport.get("https://b.test/sitemap.xml").is_err());
/// assert!(transport.get("https://b.test/sitemap.xml").is_ok());
/// assert_eq!(transport.calls("https://b.test/sitemap.xml"), 2);
/// ```
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport answering each URL with HTTP 200 and its body.
    pub fn with_bodies(bodies: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        let transport = Self::new();
        for (url, body) in bodies {
            transport.respond(url, Reply::Body(body.into()));
        }
        transport
    }

    /// Replace everything scripted for `url` with a single reply.
    pub fn respond(&self, url: impl Into<String>, reply: Reply) {
        let mut routes = self.routes();
        let route = routes.entry(url.into()).or_default();
        route.replies.clear();
        route.replies.push_back(reply);
    }

    /// Add a reply to the end of the queue for `url`.
    pub fn enqueue(&self, url: impl Into<String>, reply: Reply) {
        self.routes().entry(url.into()).or_default().replies.push_back(reply);
    }

    /// Number of requests made for `url` so far.
    pub fn calls(&self, url: &str) -> usize {
        self.routes().get(url).map_or(0, |route| route.calls)
    }

    /// Number of requests made for any URL so far.
    pub fn total_calls(&self) -> usize {
        self.routes().values().map(|route| route.calls).sum()
    }

    fn routes(&self) -> MutexGuard<'_, HashMap<String, Route>> {
        // A panicking test poisons the lock; the map itself is still fine.
        self.routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str) -> Result<Body> {
        let reply = {
            let mut routes = self.routes();
            let route = routes.entry(url.to_string()).or_default();
            route.calls += 1;
            match route.replies.len() {
                0 => Reply::Status(404),
                1 => route.replies[0].clone(),
                _ => route.replies.pop_front().unwrap_or(Reply::Status(404)),
            }
        };
        match reply {
            Reply::Body(body) => Ok(Box::new(Cursor::new(body))),
            Reply::Status(status) => match ErrorKind::from_status(status) {
                Some(kind) => exn::bail!(kind),
                None => Ok(Box::new(io::empty())),
            },
            Reply::Network => exn::bail!(ErrorKind::Network),
            Reply::Timeout => exn::bail!(ErrorKind::Timeout),
            Reply::Truncated(body) => Ok(Box::new(Cursor::new(body).chain(Disconnected))),
        }
    }
}

/// Reader that fails like a dropped connection.
struct Disconnected;

impl Read for Disconnected {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"))
    }
}
