//! Conversion between `DateTime<Utc>` and the store's textual datetime formats.
//!
//! The store writes `yyyy-MM-dd HH:mm:ss.SSS` in UTC. On read it may also hand
//! back ISO-8601 text with a `Z` or `+hh:mm` suffix, depending on the column
//! type and gateway version.

use crate::dlog;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Native store format, always with millisecond precision.
pub const STORE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Native store format with optional fractional seconds, for parsing.
const STORE_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format in [`STORE_FORMAT`].
///
/// Years past 9999 come out as `+10000-..`, which [`decode`] cannot read back.
pub fn encode(t: DateTime<Utc>) -> String {
    t.format(STORE_FORMAT).to_string()
}

/// Parse store text, falling back to the current time when it is unparseable.
///
/// Never fails: one corrupt timestamp must not abort decoding of a batch.
pub fn decode(text: &str) -> DateTime<Utc> {
    try_decode(text).unwrap_or_else(|| {
        dlog!("timestamp_fallback text={text:?}");
        Utc::now()
    })
}

/// Strict variant of [`decode`].
pub fn try_decode(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.ends_with('Z') || text.contains('+') {
        return DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, STORE_PARSE_FORMAT).ok()?;
    // The native path carries at most millisecond precision.
    DateTime::from_timestamp_millis(naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_uses_store_format() {
        let t = Utc.with_ymd_and_hms(2025, 4, 28, 12, 30, 5).unwrap()
            + chrono::Duration::milliseconds(7);
        assert_eq!(encode(t), "2025-04-28 12:30:05.007");
    }

    #[test]
    fn test_round_trip_keeps_milliseconds() {
        let t = Utc.timestamp_millis_opt(1_745_843_405_123).unwrap();
        assert_eq!(decode(&encode(t)), t);
    }

    #[test]
    fn test_decode_native_without_fraction() {
        let expected = Utc.with_ymd_and_hms(2025, 4, 28, 12, 0, 0).unwrap();
        assert_eq!(try_decode("2025-04-28 12:00:00"), Some(expected));
    }

    #[test]
    fn test_decode_iso_zulu_and_offset() {
        let expected = Utc.with_ymd_and_hms(2025, 4, 28, 12, 0, 0).unwrap();
        assert_eq!(try_decode("2025-04-28T12:00:00Z"), Some(expected));
        assert_eq!(try_decode("2025-04-28T14:00:00+02:00"), Some(expected));
        assert_eq!(try_decode("2025-04-28T12:00:00.500Z").map(|t| t.timestamp_subsec_millis()), Some(500));
    }

    #[test]
    fn test_five_digit_years_do_not_round_trip() {
        let t = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
        let text = encode(t);
        assert!(text.starts_with("+10000-01-01"), "{text}");
        assert_eq!(try_decode(&text), None);
    }

    #[test]
    fn test_decode_garbage_falls_back_to_now() {
        for text in ["", "not a date", "2025-13-45 99:99:99", "2025-04-28T12:00:00+zz"] {
            let before = Utc::now();
            let got = decode(text);
            let after = Utc::now();
            assert!(got >= before && got <= after, "{text:?} -> {got}");
        }
    }
}
