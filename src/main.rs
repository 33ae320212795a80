mod cli;
mod error;

use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use sitemapped_cache::Cache;
use sitemapped_config::Config;
use sitemapped_fetch::{Downloader, HttpTransport};
use sitemapped_sitemap::{Resolver, Summary};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    match run(&cli) {
        Ok(summary) => {
            tracing::info!(sitemaps = summary.sitemaps, urls = summary.urls, skipped = summary.skipped, "Done");
            ExitCode::SUCCESS
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr; stdout is reserved for URLs.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<Summary> {
    let config = Config::load(&cli.overrides()).or_raise(|| ErrorKind::Config)?;
    let transport = HttpTransport::new(&config.http_options()).or_raise(|| ErrorKind::Client)?;
    let cache = Cache::new(&config.cache_dir, Downloader::new(transport, config.retry_policy()));
    tracing::debug!(cache_dir = %cache.root().display(), "Using cache");

    let resolver = Resolver::new(&cache).force(config.force).policy(config.on_error);
    let mut output = BufWriter::new(io::stdout().lock());
    let summary = resolver.resolve(&cli.url, &mut output).or_raise(|| ErrorKind::Resolve(cli.url.clone()))?;
    output.flush().or_raise(|| ErrorKind::Output)?;
    Ok(summary)
}
