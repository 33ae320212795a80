//! Sitemap documents: what kind they are, what's in them, and where they
//! lead.
//!
//! - [`classify`] sniffs whether a document is a sitemap index or a leaf
//!   sitemap from its first [`PREFIX_LEN`] bytes.
//! - [`decode_index`] and [`decode_leaf`] parse the two document shapes.
//! - [`Resolver`] drives the whole thing: fetch the root document through
//!   the cache, classify it, and either write its URLs or fetch and write
//!   the URLs of every sitemap it lists. Gzip-compressed documents are
//!   decompressed transparently.
//!
//! # Examples
//!
//! ```no_run
//! use sitemapped_cache::Cache;
//! use sitemapped_fetch::{Downloader, HttpOptions, HttpTransport, RetryPolicy};
//! use sitemapped_sitemap::{ErrorPolicy, Resolver};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(&HttpOptions::default()).map_err(|e| (*e).to_string())?;
//! let cache = Cache::new("/tmp/sitemap", Downloader::new(transport, RetryPolicy::default()));
//! let summary = Resolver::new(&cache)
//!     .policy(ErrorPolicy::Skip)
//!     .resolve("https://example.com/sitemap_index.xml", &mut std::io::stdout().lock())
//!     .map_err(|e| (*e).to_string())?;
//! eprintln!("{} URLs from {} sitemaps", summary.urls, summary.sitemaps);
//! # Ok(())
//! # }
//! ```

mod classify;
mod decode;
pub mod error;
mod policy;
mod resolve;

pub use crate::classify::{Document, PREFIX_LEN, classify, classify_path};
pub use crate::decode::{IndexEntry, UrlEntry, decode_index, decode_leaf};
pub use crate::policy::ErrorPolicy;
pub use crate::resolve::{Resolver, Summary};
