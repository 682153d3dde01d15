//! Forward conversion: CursorValue → legacy segment.
//!
//! Timestamps are written as `<RFC 3339>?TIME`, everything else as its plain
//! text followed by `?STRING`. Nothing is escaped, so text containing `,` or
//! `?` does not survive a round trip.

use base64::Engine;
use chrono::{DateTime, Utc};
use cursor_core::CursorValue;

use crate::{LegacyKind, KIND_SEPARATOR, SEGMENT_SEPARATOR};

/// Format a timestamp with trailing zero fraction digits removed.
///
/// `2024-01-02T15:04:05.500Z` is written as `2024-01-02T15:04:05.5Z` and a
/// whole second drops the fraction entirely.
pub fn format_legacy_timestamp(dt: &DateTime<Utc>) -> String {
    let full = cursor_json::format_timestamp(dt);
    match full.strip_suffix('Z').and_then(|s| s.rsplit_once('.')) {
        Some((seconds, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{seconds}Z")
            } else {
                format!("{seconds}.{fraction}Z")
            }
        }
        None => full,
    }
}

/// Plain text rendering of a value.
///
/// Null renders as the empty string. Arrays render as `[a b]` and records as
/// `{a b}`, member values only.
pub fn legacy_text(value: &CursorValue) -> String {
    match value {
        CursorValue::Null => String::new(),
        CursorValue::Bool(b) => b.to_string(),
        CursorValue::Int8(i) => i.to_string(),
        CursorValue::Int16(i) => i.to_string(),
        CursorValue::Int32(i) => i.to_string(),
        CursorValue::Int64(i) => i.to_string(),
        CursorValue::UInt8(u) => u.to_string(),
        CursorValue::UInt16(u) => u.to_string(),
        CursorValue::UInt32(u) => u.to_string(),
        CursorValue::UInt64(u) => u.to_string(),
        CursorValue::Float32(f) => f.to_string(),
        CursorValue::Float64(f) => f.to_string(),
        CursorValue::Text(s) => s.clone(),
        CursorValue::Timestamp(dt) => format_legacy_timestamp(dt),
        CursorValue::Uuid(u) => u.hyphenated().to_string(),
        CursorValue::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
        CursorValue::Json(v) => v.to_string(),
        CursorValue::Array(values) => {
            let parts: Vec<String> = values.iter().map(legacy_text).collect();
            format!("[{}]", parts.join(" "))
        }
        CursorValue::Record(fields) => {
            let parts: Vec<String> = fields.iter().map(|(_, v)| legacy_text(v)).collect();
            format!("{{{}}}", parts.join(" "))
        }
    }
}

/// Kind tag a value is written with.
pub fn legacy_kind(value: &CursorValue) -> LegacyKind {
    match value {
        CursorValue::Timestamp(_) => LegacyKind::Time,
        _ => LegacyKind::String,
    }
}

/// Encode one value as a `value?KIND` segment.
pub fn encode_segment(value: &CursorValue) -> String {
    format!(
        "{}{}{}",
        legacy_text(value),
        KIND_SEPARATOR,
        legacy_kind(value).as_str()
    )
}

/// Encode values as comma-joined segments, in order.
pub fn encode_payload(values: &[CursorValue]) -> String {
    let separator = SEGMENT_SEPARATOR.to_string();
    let segments: Vec<String> = values.iter().map(encode_segment).collect();
    segments.join(separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(nanos: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap() + chrono::Duration::nanoseconds(nanos)
    }

    #[test]
    fn test_timestamp_trailing_zeros_trimmed() {
        assert_eq!(format_legacy_timestamp(&ts(1)), "2024-01-02T15:04:05.000000001Z");
        assert_eq!(format_legacy_timestamp(&ts(500_000_000)), "2024-01-02T15:04:05.5Z");
        assert_eq!(format_legacy_timestamp(&ts(0)), "2024-01-02T15:04:05Z");
    }

    #[test]
    fn test_scalar_segments() {
        assert_eq!(encode_segment(&CursorValue::Int64(5)), "5?STRING");
        assert_eq!(encode_segment(&CursorValue::text("foo")), "foo?STRING");
        assert_eq!(encode_segment(&CursorValue::Bool(true)), "true?STRING");
        assert_eq!(encode_segment(&CursorValue::Float64(2.5)), "2.5?STRING");
        assert_eq!(encode_segment(&CursorValue::Null), "?STRING");
    }

    #[test]
    fn test_timestamp_segment() {
        assert_eq!(
            encode_segment(&CursorValue::Timestamp(ts(1))),
            "2024-01-02T15:04:05.000000001Z?TIME"
        );
    }

    #[test]
    fn test_composite_text() {
        let value = CursorValue::Array(vec![CursorValue::Int32(1), CursorValue::text("a")]);
        assert_eq!(legacy_text(&value), "[1 a]");

        let record = CursorValue::Record(vec![
            ("ID".to_string(), CursorValue::Int64(5)),
            ("Name".to_string(), CursorValue::text("foo")),
        ]);
        assert_eq!(legacy_text(&record), "{5 foo}");
    }

    #[test]
    fn test_encode_payload() {
        let payload = encode_payload(&[CursorValue::Int64(5), CursorValue::Timestamp(ts(1))]);
        assert_eq!(payload, "5?STRING,2024-01-02T15:04:05.000000001Z?TIME");
        assert_eq!(encode_payload(&[]), "");
    }
}
