//! Human-friendly durations: a bare integer is seconds, otherwise a number
//! followed by `ms`, `s`, `m` or `h`.

use crate::error::{ErrorKind, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use std::fmt;
use std::time::Duration;

/// Parse a timeout as given on the command line or in a config file.
///
/// ```
/// use std::time::Duration;
/// use sitemapped_config::parse_duration;
///
/// assert_eq!(parse_duration("15").unwrap(), Duration::from_secs(15));
/// assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
/// assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    let split = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let Ok(number) = number.parse::<u64>() else {
        exn::bail!(ErrorKind::InvalidDuration(input.to_string()));
    };
    let duration = match unit.trim() {
        "" | "s" => Duration::from_secs(number),
        "ms" => Duration::from_millis(number),
        "m" => Duration::from_secs(number.saturating_mul(60)),
        "h" => Duration::from_secs(number.saturating_mul(60 * 60)),
        _ => exn::bail!(ErrorKind::InvalidDuration(input.to_string())),
    };
    Ok(duration)
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
    deserializer.deserialize_any(DurationVisitor)
}

/// Serializes in a form [`deserialize`] reads back exactly.
pub(crate) fn serialize_some<S: Serializer>(
    value: &Option<Duration>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(duration) => serializer.serialize_str(&format!("{}ms", duration.as_millis())),
        None => serializer.serialize_none(),
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number of seconds, or a string such as \"15s\" or \"500ms\"")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Duration, E> {
        Ok(Duration::from_secs(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Duration, E> {
        u64::try_from(value)
            .map(Duration::from_secs)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Duration, E> {
        parse_duration(value).map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", Duration::ZERO)]
    #[case("15", Duration::from_secs(15))]
    #[case(" 15s ", Duration::from_secs(15))]
    #[case("250ms", Duration::from_millis(250))]
    #[case("3m", Duration::from_secs(180))]
    #[case("1h", Duration::from_secs(3600))]
    #[case("10 s", Duration::from_secs(10))]
    fn test_parse(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_duration(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("s")]
    #[case("-5")]
    #[case("1.5s")]
    #[case("5d")]
    #[case("fifteen")]
    fn test_parse_invalid(#[case] input: &str) {
        assert_eq!(*parse_duration(input).unwrap_err(), ErrorKind::InvalidDuration(input.to_string()));
    }
}
