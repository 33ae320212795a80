use derive_more::Display;
use std::str::FromStr;

/// What to do when one sitemap listed in an index can't be resolved.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize), serde(rename_all = "lowercase"))]
pub enum ErrorPolicy {
    /// Stop at the first failing sitemap.
    #[default]
    #[display("abort")]
    Abort,
    /// Log a warning and carry on with the next sitemap.
    #[display("skip")]
    Skip,
}

impl FromStr for ErrorPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(format!("unknown error policy {s:?} (expected \"abort\" or \"skip\")")),
        }
    }
}
