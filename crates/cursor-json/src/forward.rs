//! Forward conversion: CursorValue → JSON value.
//!
//! Each value uses JSON's native representation: numbers as numbers, text as
//! strings, timestamps as RFC 3339 strings with fixed nanosecond precision.

use base64::Engine;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use cursor_core::CursorValue;
use serde_json::json;

use crate::error::{JsonTypesError, Result};

/// Wrapper for JSON values.
#[derive(Debug, Clone)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

impl TryFrom<&CursorValue> for JsonValue {
    type Error = JsonTypesError;

    fn try_from(value: &CursorValue) -> Result<Self> {
        to_json(value).map(JsonValue)
    }
}

/// Format a timestamp the way cursors carry it: RFC 3339, UTC, nanoseconds.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Convert a value to JSON.
///
/// Fails only for values without a deterministic JSON encoding: NaN and
/// infinities, and timestamps outside the years 0000-9999.
pub fn to_json(value: &CursorValue) -> Result<serde_json::Value> {
    let json = match value {
        CursorValue::Null => serde_json::Value::Null,
        CursorValue::Bool(b) => json!(*b),

        CursorValue::Int8(i) => json!(*i),
        CursorValue::Int16(i) => json!(*i),
        CursorValue::Int32(i) => json!(*i),
        CursorValue::Int64(i) => json!(*i),
        CursorValue::UInt8(u) => json!(*u),
        CursorValue::UInt16(u) => json!(*u),
        CursorValue::UInt32(u) => json!(*u),
        CursorValue::UInt64(u) => json!(*u),

        // Use the shortest decimal form so 1.1f32 is written as 1.1
        // rather than its widened f64 expansion.
        CursorValue::Float32(f) => float_to_json(f64::from(*f), f.to_string().parse().ok())?,
        CursorValue::Float64(f) => float_to_json(*f, Some(*f))?,

        CursorValue::Text(s) => json!(s),
        CursorValue::Timestamp(dt) => {
            if !(0..=9999).contains(&dt.year()) {
                return Err(JsonTypesError::TimestampOutOfRange {
                    value: dt.to_string(),
                });
            }
            json!(format_timestamp(dt))
        }
        CursorValue::Uuid(u) => json!(u.hyphenated().to_string()),
        CursorValue::Bytes(b) => json!(base64::engine::general_purpose::STANDARD.encode(b)),
        CursorValue::Json(v) => v.clone(),

        CursorValue::Array(values) => {
            serde_json::Value::Array(values.iter().map(to_json).collect::<Result<Vec<_>>>()?)
        }
        CursorValue::Record(fields) => {
            let mut obj = serde_json::Map::new();
            for (name, member) in fields {
                obj.insert(name.clone(), to_json(member)?);
            }
            serde_json::Value::Object(obj)
        }
    };
    Ok(json)
}

fn float_to_json(original: f64, shortest: Option<f64>) -> Result<serde_json::Value> {
    shortest
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .ok_or(JsonTypesError::NonFiniteFloat { value: original })
}

/// Convert an ordered list of values to a JSON array.
pub fn values_to_json_array(values: &[CursorValue]) -> Result<serde_json::Value> {
    Ok(serde_json::Value::Array(
        values.iter().map(to_json).collect::<Result<Vec<_>>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_null_conversion() {
        assert!(to_json(&CursorValue::Null).unwrap().is_null());
    }

    #[test]
    fn test_bool_conversion() {
        assert_eq!(to_json(&CursorValue::Bool(true)).unwrap(), json!(true));
        assert_eq!(to_json(&CursorValue::Bool(false)).unwrap(), json!(false));
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(to_json(&CursorValue::Int8(-8)).unwrap(), json!(-8));
        assert_eq!(to_json(&CursorValue::Int32(12345)).unwrap(), json!(12345));
        assert_eq!(
            to_json(&CursorValue::Int64(9876543210)).unwrap(),
            json!(9876543210i64)
        );
        assert_eq!(
            to_json(&CursorValue::UInt64(u64::MAX)).unwrap(),
            json!(u64::MAX)
        );
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(to_json(&CursorValue::Float64(1.23456)).unwrap(), json!(1.23456));
        assert_eq!(
            serde_json::to_string(&to_json(&CursorValue::Float32(1.1)).unwrap()).unwrap(),
            "1.1"
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for value in [
            CursorValue::Float64(f64::NAN),
            CursorValue::Float64(f64::INFINITY),
            CursorValue::Float32(f32::NEG_INFINITY),
        ] {
            let err = to_json(&value).unwrap_err();
            assert!(matches!(err, JsonTypesError::NonFiniteFloat { .. }));
        }
    }

    #[test]
    fn test_text_conversion() {
        assert_eq!(
            to_json(&CursorValue::text("hello world")).unwrap(),
            json!("hello world")
        );
    }

    #[test]
    fn test_timestamp_conversion() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap()
            + chrono::Duration::nanoseconds(1);
        assert_eq!(
            to_json(&CursorValue::Timestamp(dt)).unwrap(),
            json!("2024-01-02T15:04:05.000000001Z")
        );
    }

    #[test]
    fn test_timestamp_year_range() {
        let last = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            to_json(&CursorValue::Timestamp(last)).unwrap(),
            json!("9999-12-31T23:59:59.000000000Z")
        );

        let first = Utc.with_ymd_and_hms(0, 1, 1, 0, 0, 0).unwrap();
        assert!(to_json(&CursorValue::Timestamp(first)).is_ok());

        for year in [10000, -1] {
            let dt = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap();
            let err = to_json(&CursorValue::Timestamp(dt)).unwrap_err();
            assert!(matches!(err, JsonTypesError::TimestampOutOfRange { .. }));
        }
    }

    #[test]
    fn test_uuid_conversion() {
        let u = uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            to_json(&CursorValue::Uuid(u)).unwrap(),
            json!("550e8400-e29b-41d4-a716-446655440000")
        );
    }

    #[test]
    fn test_bytes_conversion() {
        let json_val = JsonValue::try_from(&CursorValue::Bytes(vec![0xDE, 0xAD, 0xBE, 0xEF]))
            .unwrap()
            .into_inner();
        assert_eq!(json_val, json!("3q2+7w=="));
    }

    #[test]
    fn test_array_and_record_conversion() {
        let value = CursorValue::Array(vec![
            CursorValue::Record(vec![
                ("amount".to_string(), CursorValue::Int64(100)),
                ("currency".to_string(), CursorValue::text("EUR")),
            ]),
            CursorValue::Null,
        ]);
        assert_eq!(
            to_json(&value).unwrap(),
            json!([{"amount": 100, "currency": "EUR"}, null])
        );
    }

    #[test]
    fn test_values_to_json_array() {
        let arr = values_to_json_array(&[CursorValue::Int64(5), CursorValue::text("foo")]).unwrap();
        assert_eq!(serde_json::to_string(&arr).unwrap(), r#"[5,"foo"]"#);
    }

    #[test]
    fn test_nested_non_finite_float_rejected() {
        let value = CursorValue::Array(vec![CursorValue::Float64(1.0), CursorValue::Float64(f64::NAN)]);
        assert!(values_to_json_array(&[value]).is_err());
    }
}
