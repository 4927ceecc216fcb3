// ampere_core/src/time.rs

//! Stateless helpers for the timestamps found in measurement logs.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The literal layout of a log timestamp, e.g. `2025-01-09 11:51:34`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("malformed timestamp `{input}`, expected YYYY-MM-DD HH:MM:SS")]
    MalformedTimestamp { input: String },
}

/// Parses a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Timestamps carry no zone information and are treated as UTC wall time, so
/// differences are never affected by daylight-saving transitions.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime, TimeError> {
    NaiveDateTime::parse_from_str(input.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        TimeError::MalformedTimestamp {
            input: input.to_string(),
        }
    })
}

/// Seconds elapsed from `earlier` to `later`. Negative when `later` precedes `earlier`.
pub fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let diff = later.signed_duration_since(earlier);
    match diff.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        // Only reachable for spans of several hundred thousand years.
        None => diff.num_milliseconds() as f64 / 1e3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_timestamp_valid() {
        let t = parse_timestamp("2025-01-09 11:51:34").unwrap();
        assert_eq!(t.to_string(), "2025-01-09 11:51:34");
    }

    #[test]
    fn test_parse_timestamp_tolerates_surrounding_whitespace() {
        assert!(parse_timestamp(" 2025-01-09 11:51:34 ").is_ok());
    }

    #[test]
    fn test_parse_timestamp_rejects_other_layouts() {
        for bad in [
            "",
            "2025-01-09_11-51-34",
            "2025/01/09 11:51:34",
            "2025-13-09 11:51:34",
            "2025-01-09",
            "yesterday",
        ] {
            let err = parse_timestamp(bad).unwrap_err();
            assert_eq!(
                err,
                TimeError::MalformedTimestamp {
                    input: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn test_seconds_between() {
        let a = parse_timestamp("2025-01-09 23:59:30").unwrap();
        let b = parse_timestamp("2025-01-10 00:01:00").unwrap();
        assert_abs_diff_eq!(seconds_between(a, b), 90.0);
        assert_abs_diff_eq!(seconds_between(b, a), -90.0);
        assert_abs_diff_eq!(seconds_between(a, a), 0.0);
    }
}
