//! Canonical text codec for persisted timestamps.
//!
//! # Invariants
//! - Encoded values are UTC with millisecond precision and sort
//!   lexicographically in chronological order.
//! - Only years `0..=9999` are storable; `%Y` adds a sign outside that range.
//! - Decoding is lenient about legacy layouts but never guesses a timezone
//!   other than UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, Utc};

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
pub const MIN_STORABLE_YEAR: i32 = 0;
pub const MAX_STORABLE_YEAR: i32 = 9999;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats a timestamp in the canonical storage layout.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.format(CANONICAL_FORMAT).to_string()
}

/// Parses a stored timestamp.
///
/// Returns `None` when the text matches none of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

/// Returns whether `value` encodes to text that [`parse_timestamp`] reads back.
pub fn is_storable(value: DateTime<Utc>) -> bool {
    (MIN_STORABLE_YEAR..=MAX_STORABLE_YEAR).contains(&value.year())
}

/// Drops sub-millisecond precision that storage would not keep.
pub fn to_storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

/// Current time truncated to the precision kept by storage.
pub fn now_millis() -> DateTime<Utc> {
    to_storage_precision(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, is_storable, parse_timestamp, to_storage_precision};
    use chrono::{TimeZone, Utc};

    #[test]
    fn canonical_format_roundtrips() {
        let value = Utc.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        let text = format_timestamp(value);
        assert_eq!(text, "2026-03-09T07:05:01.000Z");
        assert_eq!(parse_timestamp(&text), Some(value));
    }

    #[test]
    fn canonical_text_sorts_chronologically() {
        let earlier = format_timestamp(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap());
        let later = format_timestamp(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert!(earlier < later);
    }

    #[test]
    fn legacy_layouts_are_accepted() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn four_digit_years_are_storable_and_others_are_not() {
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(is_storable(last));
        assert_eq!(parse_timestamp(&format_timestamp(last)), Some(last));

        let beyond = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_storable(beyond));
        assert_eq!(parse_timestamp(&format_timestamp(beyond)), None);
        assert!(!is_storable(Utc.with_ymd_and_hms(-1, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn storage_precision_keeps_milliseconds_only() {
        let value = Utc.timestamp_opt(1_893_456_000, 1_500_000).unwrap();
        let truncated = to_storage_precision(value);
        assert_eq!(truncated.timestamp_subsec_nanos(), 1_000_000);
        assert_eq!(parse_timestamp(&format_timestamp(value)), Some(truncated));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_timestamp("tomorrow"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
