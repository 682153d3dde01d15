//! Reverse conversion: legacy segment → CursorValue.
//!
//! Decoding a segment needs no schema: `TIME` segments become timestamps and
//! everything else is kept as text. Migration to the current format then uses
//! [`LegacyTextWithSchema`] to read that text as the field's declared type.

use base64::Engine;
use chrono::{DateTime, Utc};
use cursor_core::{CursorValue, FieldSchema, FieldType};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LegacyError, Result};
use crate::{LegacyKind, KIND_SEPARATOR, SEGMENT_SEPARATOR};

/// What to do with a `TIME` segment that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFallback {
    /// Substitute the current UTC time.
    #[default]
    Now,
    /// Treat the segment as malformed.
    Reject,
}

/// Split a segment on its last `?` into value text and kind.
pub fn split_segment(segment: &str) -> Result<(&str, LegacyKind)> {
    let (value, kind) =
        segment
            .rsplit_once(KIND_SEPARATOR)
            .ok_or_else(|| LegacyError::InvalidSegment {
                segment: segment.to_string(),
            })?;
    Ok((value, LegacyKind::parse(kind)))
}

/// Decode one `value?KIND` segment.
pub fn decode_segment(segment: &str, fallback: TimestampFallback) -> Result<CursorValue> {
    let (value, kind) = split_segment(segment)?;
    match kind {
        LegacyKind::Time => match cursor_json::parse_timestamp(value) {
            Ok(dt) => Ok(CursorValue::Timestamp(dt)),
            Err(_) => match fallback {
                TimestampFallback::Now => {
                    let now = Utc::now();
                    warn!("Unparsable legacy timestamp '{value}', substituting {now}");
                    Ok(CursorValue::Timestamp(now))
                }
                TimestampFallback::Reject => Err(LegacyError::InvalidTimestamp {
                    value: value.to_string(),
                }),
            },
        },
        LegacyKind::String | LegacyKind::Other(_) => Ok(CursorValue::text(value)),
    }
}

/// Decode a whole comma-joined payload. The first bad segment fails the lot.
pub fn decode_payload(payload: &str, fallback: TimestampFallback) -> Result<Vec<CursorValue>> {
    payload
        .split(SEGMENT_SEPARATOR)
        .map(|segment| decode_segment(segment, fallback))
        .collect()
}

/// Legacy text paired with its field definition.
#[derive(Debug, Clone)]
pub struct LegacyTextWithSchema<'a> {
    /// The text carried by the segment.
    pub value: &'a str,
    /// The field the text belongs to.
    pub field: &'a FieldSchema,
}

impl<'a> LegacyTextWithSchema<'a> {
    pub fn new(value: &'a str, field: &'a FieldSchema) -> Self {
        Self { value, field }
    }

    /// Convert to CursorValue. Empty text is `Null` for nullable fields.
    pub fn to_cursor_value(&self) -> Result<CursorValue> {
        if self.value.is_empty() && self.field.nullable {
            return Ok(CursorValue::Null);
        }
        coerce_text(self.value, &self.field.field_type)
    }
}

fn coercion_error(value: &str, field_type: &FieldType, message: impl ToString) -> LegacyError {
    LegacyError::Coercion {
        value: value.to_string(),
        expected_type: field_type.to_string(),
        message: message.to_string(),
    }
}

fn parse_number<T>(value: &str, field_type: &FieldType) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| coercion_error(value, field_type, e))
}

/// Read legacy text as the given field type.
pub fn coerce_text(value: &str, field_type: &FieldType) -> Result<CursorValue> {
    let converted = match field_type {
        FieldType::Bool => match value.to_lowercase().as_str() {
            "true" | "1" | "t" => CursorValue::Bool(true),
            "false" | "0" | "f" => CursorValue::Bool(false),
            _ => return Err(coercion_error(value, field_type, "Invalid boolean value")),
        },

        FieldType::Int8 => CursorValue::Int8(parse_number(value, field_type)?),
        FieldType::Int16 => CursorValue::Int16(parse_number(value, field_type)?),
        FieldType::Int32 => CursorValue::Int32(parse_number(value, field_type)?),
        FieldType::Int64 => CursorValue::Int64(parse_number(value, field_type)?),
        FieldType::UInt8 => CursorValue::UInt8(parse_number(value, field_type)?),
        FieldType::UInt16 => CursorValue::UInt16(parse_number(value, field_type)?),
        FieldType::UInt32 => CursorValue::UInt32(parse_number(value, field_type)?),
        FieldType::UInt64 => CursorValue::UInt64(parse_number(value, field_type)?),
        FieldType::Float32 => CursorValue::Float32(parse_number(value, field_type)?),
        FieldType::Float64 => CursorValue::Float64(parse_number(value, field_type)?),

        FieldType::Text => CursorValue::text(value),

        FieldType::Timestamp => CursorValue::Timestamp(
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| coercion_error(value, field_type, e))?,
        ),

        FieldType::Uuid => CursorValue::Uuid(
            uuid::Uuid::parse_str(value).map_err(|e| coercion_error(value, field_type, e))?,
        ),

        FieldType::Bytes => CursorValue::Bytes(
            base64::engine::general_purpose::STANDARD
                .decode(value)
                .map_err(|e| coercion_error(value, field_type, e))?,
        ),

        // Composite values were only ever written as JSON text by callers
        // that stored them in legacy cursors at all.
        FieldType::Json | FieldType::Array { .. } | FieldType::Record(_) => {
            let json: serde_json::Value =
                serde_json::from_str(value).map_err(|e| coercion_error(value, field_type, e))?;
            cursor_json::json_to_cursor_value(&json, field_type)
                .map_err(|e| coercion_error(value, field_type, e))?
        }
    };
    Ok(converted)
}

/// Re-type an already decoded legacy value for a field.
///
/// Timestamps from `TIME` segments are kept when the field is a timestamp and
/// rendered back to text otherwise; text goes through [`LegacyTextWithSchema`].
pub fn coerce_value(value: &CursorValue, field: &FieldSchema) -> Result<CursorValue> {
    match value {
        CursorValue::Timestamp(_) if field.field_type == FieldType::Timestamp => Ok(value.clone()),
        CursorValue::Text(text) => LegacyTextWithSchema::new(text, field).to_cursor_value(),
        other => {
            let text = crate::forward::legacy_text(other);
            LegacyTextWithSchema::new(&text, field).to_cursor_value()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_split_on_last_separator() {
        let (value, kind) = split_segment("what?now?STRING").unwrap();
        assert_eq!(value, "what?now");
        assert_eq!(kind, LegacyKind::String);

        let (value, kind) = split_segment("?TIME").unwrap();
        assert_eq!(value, "");
        assert_eq!(kind, LegacyKind::Time);
    }

    #[test]
    fn test_split_without_separator() {
        let err = split_segment("nope").unwrap_err();
        assert!(matches!(err, LegacyError::InvalidSegment { segment } if segment == "nope"));
    }

    #[test]
    fn test_decode_time_segment() {
        let value = decode_segment("2024-01-02T15:04:05.000000001Z?TIME", TimestampFallback::Now)
            .unwrap();
        let expected =
            Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap() + chrono::Duration::nanoseconds(1);
        assert_eq!(value, CursorValue::Timestamp(expected));
    }

    #[test]
    fn test_decode_time_with_offset_normalized() {
        let value = decode_segment("2024-01-02T16:04:05+01:00?TIME", TimestampFallback::Reject)
            .unwrap();
        assert_eq!(
            value,
            CursorValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_now() {
        let before = Utc::now();
        let value = decode_segment("garbage?TIME", TimestampFallback::Now).unwrap();
        let after = Utc::now();
        let ts = *value.as_timestamp().unwrap();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let err = decode_segment("garbage?TIME", TimestampFallback::Reject).unwrap_err();
        assert!(matches!(err, LegacyError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_other_kinds_are_text() {
        assert_eq!(
            decode_segment("5?STRING", TimestampFallback::Now).unwrap(),
            CursorValue::text("5")
        );
        assert_eq!(
            decode_segment("5?INT", TimestampFallback::Now).unwrap(),
            CursorValue::text("5")
        );
    }

    #[test]
    fn test_decode_payload() {
        let values = decode_payload(
            "5?STRING,2024-01-02T15:04:05Z?TIME",
            TimestampFallback::Now,
        )
        .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], CursorValue::text("5"));

        assert!(decode_payload("5?STRING,nope", TimestampFallback::Now).is_err());
    }

    #[test]
    fn test_coerce_text_scalars() {
        assert_eq!(coerce_text("5", &FieldType::Int64).unwrap(), CursorValue::Int64(5));
        assert_eq!(coerce_text("200", &FieldType::UInt8).unwrap(), CursorValue::UInt8(200));
        assert_eq!(coerce_text("2.5", &FieldType::Float64).unwrap(), CursorValue::Float64(2.5));
        assert_eq!(coerce_text("true", &FieldType::Bool).unwrap(), CursorValue::Bool(true));
        assert_eq!(coerce_text("foo", &FieldType::Text).unwrap(), CursorValue::text("foo"));
        assert_eq!(
            coerce_text("550e8400-e29b-41d4-a716-446655440000", &FieldType::Uuid).unwrap(),
            CursorValue::Uuid(
                uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
            )
        );
    }

    #[test]
    fn test_coerce_text_errors() {
        let err = coerce_text("abc", &FieldType::Int32).unwrap_err();
        assert!(matches!(err, LegacyError::Coercion { expected_type, .. } if expected_type == "int"));
        assert!(coerce_text("300", &FieldType::UInt8).is_err());
        assert!(coerce_text("maybe", &FieldType::Bool).is_err());
    }

    #[test]
    fn test_coerce_text_json() {
        let value = coerce_text(r#"[1,2]"#, &FieldType::array(FieldType::Int32)).unwrap();
        assert_eq!(
            value,
            CursorValue::Array(vec![CursorValue::Int32(1), CursorValue::Int32(2)])
        );
    }

    #[test]
    fn test_empty_text_nullable() {
        let nullable = FieldSchema::nullable("Age", FieldType::Int32);
        assert_eq!(
            LegacyTextWithSchema::new("", &nullable).to_cursor_value().unwrap(),
            CursorValue::Null
        );

        let required = FieldSchema::new("Age", FieldType::Int32);
        assert!(LegacyTextWithSchema::new("", &required).to_cursor_value().is_err());

        let text = FieldSchema::new("Name", FieldType::Text);
        assert_eq!(
            LegacyTextWithSchema::new("", &text).to_cursor_value().unwrap(),
            CursorValue::text("")
        );
    }

    #[test]
    fn test_coerce_value_keeps_timestamps() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
        let field = FieldSchema::new("CreatedAt", FieldType::Timestamp);
        assert_eq!(
            coerce_value(&CursorValue::Timestamp(dt), &field).unwrap(),
            CursorValue::Timestamp(dt)
        );

        let text_field = FieldSchema::new("CreatedAt", FieldType::Text);
        assert_eq!(
            coerce_value(&CursorValue::Timestamp(dt), &text_field).unwrap(),
            CursorValue::text("2024-01-02T15:04:05Z")
        );
    }
}
