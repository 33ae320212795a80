use clap::{ArgAction, Parser};
use sitemapped_config::{Overrides, parse_duration};
use sitemapped_sitemap::ErrorPolicy;
use std::path::PathBuf;
use std::time::Duration;

/// Print every page URL listed by a sitemap or sitemap index, one per line.
///
/// Downloaded documents are cached on disk, so running again is cheap.
#[derive(Debug, Parser)]
#[command(name = "sitemapped", version, about, long_about = None)]
pub struct Cli {
    /// Sitemap or sitemap index URL
    pub url: String,

    /// Cache directory [default: <platform cache dir>/sitemap]
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Download again, even if a cached copy exists
    #[arg(short, long)]
    pub force: bool,

    /// Attempts per request, including the first [default: 3]
    #[arg(short = 'r', long = "retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Request timeout, e.g. 15, 15s, 500ms [default: 15s]
    #[arg(short = 'T', long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[arg(long = "ua", value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// What to do when a sitemap listed in an index fails: abort or skip
    #[arg(long, value_name = "POLICY")]
    pub on_error: Option<ErrorPolicy>,

    /// Config file [default: <platform config dir>/sitemapped/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_timeout(input: &str) -> Result<Duration, String> {
    parse_duration(input).map_err(|err| (*err).to_string())
}

impl Cli {
    /// Flags that were given, as the top configuration layer.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            cache_dir: self.cache_dir.clone(),
            force: self.force.then_some(true),
            max_retries: self.max_retries,
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
            insecure: self.insecure.then_some(true),
            on_error: self.on_error,
        }
    }

    /// Log filter directive used when `RUST_LOG` isn't set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    const URL: &str = "https://a.test/sitemap.xml";

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_url_only() {
        let cli = Cli::try_parse_from(["sitemapped", URL]).unwrap();
        assert_eq!(cli.url, URL);
        let overrides = cli.overrides();
        assert!(overrides.force.is_none());
        assert!(overrides.insecure.is_none());
        assert!(overrides.timeout.is_none());
        assert!(overrides.config_file.is_none());
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let err = Cli::try_parse_from(["sitemapped"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_version() {
        let err = Cli::try_parse_from(["sitemapped", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "sitemapped",
            "-f",
            "-r",
            "5",
            "-T",
            "30s",
            "--ua",
            "bot/1.0",
            "--cache-dir",
            "/tmp/c",
            "--insecure",
            "--on-error",
            "skip",
            "--config",
            "/etc/sitemapped.toml",
            URL,
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.force, Some(true));
        assert_eq!(overrides.max_retries, Some(5));
        assert_eq!(overrides.timeout, Some(Duration::from_secs(30)));
        assert_eq!(overrides.user_agent.as_deref(), Some("bot/1.0"));
        assert_eq!(overrides.cache_dir, Some(PathBuf::from("/tmp/c")));
        assert_eq!(overrides.insecure, Some(true));
        assert_eq!(overrides.on_error, Some(ErrorPolicy::Skip));
        assert_eq!(overrides.config_file, Some(PathBuf::from("/etc/sitemapped.toml")));
    }

    #[rstest]
    #[case(&["-T", "soon"])]
    #[case(&["-r", "-1"])]
    #[case(&["--on-error", "ignore"])]
    #[case(&["-v", "-q"])]
    fn test_rejected(#[case] args: &[&str]) {
        let argv = ["sitemapped"].iter().chain(args).chain([&URL]);
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[rstest]
    #[case(&[], "warn")]
    #[case(&["-v"], "info")]
    #[case(&["-vv"], "debug")]
    #[case(&["-vvvv"], "trace")]
    #[case(&["-q"], "error")]
    fn test_log_level(#[case] args: &[&str], #[case] expected: &str) {
        let argv = ["sitemapped"].iter().chain(args).chain([&URL]);
        assert_eq!(Cli::try_parse_from(argv).unwrap().log_level(), expected);
    }
}
