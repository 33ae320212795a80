//! Layered configuration.
//!
//! Later layers win:
//!
//! 1. Compiled-in defaults
//! 2. A TOML config file: `--config <file>`, or `config.toml` in the
//!    platform config directory if it exists
//! 3. `SITEMAPPED_*` environment variables (`SITEMAPPED_MAX_RETRIES=5`)
//! 4. Command-line flags ([`Overrides`])
//!
//! ```toml
//! cache_dir = "/var/cache/sitemap"
//! max_retries = 5
//! timeout = "30s"
//! on_error = "skip"
//! ```

mod duration;
pub mod error;

pub use crate::duration::parse_duration;
use crate::error::{ErrorKind, Result};
use directories::{BaseDirs, ProjectDirs};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use sitemapped_fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpOptions, RetryPolicy};
use sitemapped_sitemap::ErrorPolicy;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "SITEMAPPED_";
const APPLICATION: &str = "sitemapped";
const CONFIG_FILE: &str = "config.toml";
const CACHE_SUBDIR: &str = "sitemap";

/// `<platform cache dir>/sitemap`, e.g. `~/.cache/sitemap` on Linux.
pub fn default_cache_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.cache_dir().join(CACHE_SUBDIR))
}

/// `<platform config dir>/sitemapped/config.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache_dir: PathBuf,
    /// Download documents again even if they're cached.
    pub force: bool,
    /// Total attempts per request, including the first.
    pub max_retries: u32,
    #[serde(deserialize_with = "duration::deserialize")]
    pub timeout: Duration,
    pub user_agent: String,
    /// Accept invalid TLS certificates.
    pub insecure: bool,
    pub on_error: ErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir().unwrap_or_else(|| std::env::temp_dir().join(CACHE_SUBDIR)),
            force: false,
            max_retries: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure: false,
            on_error: ErrorPolicy::default(),
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Overrides {
    /// Read this file instead of the default one. It must exist.
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "duration::serialize_some")]
    pub timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_error: Option<ErrorPolicy>,
}

impl Config {
    /// Load and validate the configuration.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let config: Self = Self::figment(overrides)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Every layer merged, before extraction.
    pub fn figment(overrides: &Overrides) -> Result<Figment> {
        let mut figment = Figment::new();
        match &overrides.config_file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.clone())),
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                if let Some(path) = default_config_file() {
                    tracing::trace!(path = %path.display(), "Default config file");
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)).merge(Serialized::defaults(overrides)))
    }

    fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            exn::bail!(ErrorKind::InvalidValue("max_retries"));
        }
        if self.timeout.is_zero() {
            exn::bail!(ErrorKind::InvalidValue("timeout"));
        }
        if self.user_agent.trim().is_empty() {
            exn::bail!(ErrorKind::InvalidValue("user_agent"));
        }
        Ok(())
    }

    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
            insecure: self.insecure,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }
}
