//! Utility functions and types.

use std::fmt::{Debug, Formatter};

/// Number of characters kept visible at each end of a redacted value.
const VISIBLE: usize = 3;
/// Values shorter than this (in characters) are hidden completely.
const MIN_PARTIAL: usize = 12;

/// Redact hides secrets in `Debug` output.
///
/// Api key ids and secrets are long random strings: `2SF81PCVA776S8QA9SZ7PCREX`
/// prints as `2SF***REX`, enough to tell two keys apart in a log line. Values
/// shorter than 12 characters print as `***`, absent or empty ones as `EMPTY`.
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = match self.0 {
            None | Some("") => return f.write_str("EMPTY"),
            Some(v) => v,
        };

        let count = value.chars().count();
        if count < MIN_PARTIAL {
            return f.write_str("***");
        }

        let head: String = value.chars().take(VISIBLE).collect();
        let tail: String = value.chars().skip(count - VISIBLE).collect();
        write!(f, "{head}***{tail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("", "EMPTY"),
            ("secret", "***"),
            ("elevenchars", "***"),
            ("twelve_chars", "twe***ars"),
            ("2SF81PCVA776S8QA9SZ7PCREX", "2SF***REX"),
            ("tBnn1TRMxhbzCkVHvdfWJHxrJjXtfrUGKy0LZ3CVQ6U", "tBn***Q6U"),
            ("ééééééééééééé", "ééé***ééé"),
        ];

        for (input, expected) in cases {
            assert_eq!(format!("{:?}", Redact::from(input)), expected, "input: {input}");
        }
    }

    #[test]
    fn test_redact_option() {
        assert_eq!(format!("{:?}", Redact::from(&None)), "EMPTY");
        assert_eq!(
            format!("{:?}", Redact::from(&Some("2SF81PCVA776S8QA9SZ7PCREX".to_string()))),
            "2SF***REX"
        );
    }
}
