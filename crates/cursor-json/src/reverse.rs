//! Reverse conversion: JSON value → CursorValue.
//!
//! Conversion is type-directed: the declared field type decides how a JSON
//! value is read, so a `big_int` field always comes back as `Int64` and a
//! `timestamp` field as `Timestamp`. Values that do not fit are errors.

use base64::Engine;
use chrono::{DateTime, Utc};
use cursor_core::{CursorValue, FieldSchema, FieldType, RecordSchema, Row};

use crate::error::{JsonTypesError, Result};

/// Parse an RFC 3339 timestamp, normalizing to UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| JsonTypesError::InvalidTimestamp {
            value: s.to_string(),
        })
}

/// JSON value paired with its field definition for type-aware conversion.
#[derive(Debug, Clone)]
pub struct JsonValueWithSchema<'a> {
    /// The JSON value.
    pub value: &'a serde_json::Value,
    /// The field the value belongs to.
    pub field: &'a FieldSchema,
}

impl<'a> JsonValueWithSchema<'a> {
    /// Create a new JsonValueWithSchema.
    pub fn new(value: &'a serde_json::Value, field: &'a FieldSchema) -> Self {
        Self { value, field }
    }

    /// Convert to CursorValue.
    ///
    /// `null` is accepted only for nullable fields.
    pub fn to_cursor_value(&self) -> Result<CursorValue> {
        if self.value.is_null() {
            if self.field.nullable {
                return Ok(CursorValue::Null);
            }
            return Err(JsonTypesError::UnexpectedNull {
                field: self.field.name.clone(),
                expected: self.field.field_type.to_string(),
            });
        }
        json_to_cursor_value(self.value, &self.field.field_type)
    }
}

impl TryFrom<JsonValueWithSchema<'_>> for CursorValue {
    type Error = JsonTypesError;

    fn try_from(jv: JsonValueWithSchema<'_>) -> Result<Self> {
        jv.to_cursor_value()
    }
}

/// Short name of a JSON value's kind.
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn mismatch(field_type: &FieldType, value: &serde_json::Value) -> JsonTypesError {
    JsonTypesError::TypeMismatch {
        expected: field_type.to_string(),
        actual: json_kind(value).to_string(),
    }
}

fn decode_integer<T>(value: &serde_json::Value, field_type: &FieldType) -> Result<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let serde_json::Value::Number(n) = value else {
        return Err(mismatch(field_type, value));
    };

    let converted = if let Some(i) = n.as_i64() {
        <T as TryFrom<i64>>::try_from(i).ok()
    } else if let Some(u) = n.as_u64() {
        <T as TryFrom<u64>>::try_from(u).ok()
    } else {
        return Err(mismatch(field_type, value));
    };

    converted.ok_or_else(|| JsonTypesError::NumericOverflow {
        value: n.to_string(),
        target_type: field_type.to_string(),
    })
}

fn decode_float(value: &serde_json::Value, field_type: &FieldType) -> Result<f64> {
    value.as_f64().ok_or_else(|| mismatch(field_type, value))
}

fn decode_str<'v>(value: &'v serde_json::Value, field_type: &FieldType) -> Result<&'v str> {
    value.as_str().ok_or_else(|| mismatch(field_type, value))
}

/// Convert a non-null JSON value into the given field type.
pub fn json_to_cursor_value(value: &serde_json::Value, field_type: &FieldType) -> Result<CursorValue> {
    let converted = match field_type {
        FieldType::Bool => CursorValue::Bool(
            value.as_bool().ok_or_else(|| mismatch(field_type, value))?,
        ),

        FieldType::Int8 => CursorValue::Int8(decode_integer(value, field_type)?),
        FieldType::Int16 => CursorValue::Int16(decode_integer(value, field_type)?),
        FieldType::Int32 => CursorValue::Int32(decode_integer(value, field_type)?),
        FieldType::Int64 => CursorValue::Int64(decode_integer(value, field_type)?),
        FieldType::UInt8 => CursorValue::UInt8(decode_integer(value, field_type)?),
        FieldType::UInt16 => CursorValue::UInt16(decode_integer(value, field_type)?),
        FieldType::UInt32 => CursorValue::UInt32(decode_integer(value, field_type)?),
        FieldType::UInt64 => CursorValue::UInt64(decode_integer(value, field_type)?),

        FieldType::Float32 => {
            let f = decode_float(value, field_type)?;
            let narrowed = f as f32;
            if !narrowed.is_finite() {
                return Err(JsonTypesError::NumericOverflow {
                    value: f.to_string(),
                    target_type: field_type.to_string(),
                });
            }
            CursorValue::Float32(narrowed)
        }
        FieldType::Float64 => CursorValue::Float64(decode_float(value, field_type)?),

        FieldType::Text => CursorValue::Text(decode_str(value, field_type)?.to_string()),

        FieldType::Timestamp => {
            CursorValue::Timestamp(parse_timestamp(decode_str(value, field_type)?)?)
        }

        FieldType::Uuid => {
            let s = decode_str(value, field_type)?;
            let uuid = uuid::Uuid::parse_str(s).map_err(|_| JsonTypesError::InvalidUuid {
                value: s.to_string(),
            })?;
            CursorValue::Uuid(uuid)
        }

        FieldType::Bytes => {
            let s = decode_str(value, field_type)?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(s)
                .map_err(|e| JsonTypesError::InvalidBase64 {
                    reason: e.to_string(),
                })?;
            CursorValue::Bytes(bytes)
        }

        FieldType::Json => CursorValue::Json(value.clone()),

        FieldType::Array { element_type } => {
            let arr = value.as_array().ok_or_else(|| mismatch(field_type, value))?;
            let elements = arr
                .iter()
                .map(|element| json_to_cursor_value(element, element_type))
                .collect::<Result<Vec<_>>>()?;
            CursorValue::Array(elements)
        }

        FieldType::Record(schema) => json_object_to_record(value, schema)?,
    };
    Ok(converted)
}

/// Decode a JSON object into a nested record value.
///
/// Members not in the schema are ignored; members missing from the object are
/// `Null` when nullable and an error otherwise.
fn json_object_to_record(value: &serde_json::Value, schema: &RecordSchema) -> Result<CursorValue> {
    let obj = value
        .as_object()
        .ok_or_else(|| mismatch(&FieldType::Record(schema.clone()), value))?;

    let mut fields = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let member = match obj.get(&field.name) {
            Some(member) => JsonValueWithSchema::new(member, field).to_cursor_value()?,
            None if field.nullable => CursorValue::Null,
            None => {
                return Err(JsonTypesError::MissingField {
                    field: field.name.clone(),
                })
            }
        };
        fields.push((field.name.clone(), member));
    }
    Ok(CursorValue::Record(fields))
}

/// Convert a JSON value to CursorValue without schema information.
///
/// Integers become `Int64` (or `UInt64` above `i64::MAX`), other numbers
/// `Float64`, and objects stay as `Json`.
pub fn json_value_to_cursor(value: &serde_json::Value) -> CursorValue {
    match value {
        serde_json::Value::Null => CursorValue::Null,
        serde_json::Value::Bool(b) => CursorValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CursorValue::Int64(i)
            } else if let Some(u) = n.as_u64() {
                CursorValue::UInt64(u)
            } else {
                CursorValue::Float64(n.as_f64().unwrap_or_default())
            }
        }
        serde_json::Value::String(s) => CursorValue::Text(s.clone()),
        serde_json::Value::Array(arr) => {
            CursorValue::Array(arr.iter().map(json_value_to_cursor).collect())
        }
        serde_json::Value::Object(_) => CursorValue::Json(value.clone()),
    }
}

/// Convert a JSON object to a row.
///
/// Members described by `schema` are decoded type-directed; any other member
/// (or every member, without a schema) is inferred.
pub fn json_object_to_row(
    obj: &serde_json::Map<String, serde_json::Value>,
    schema: Option<&RecordSchema>,
) -> Result<Row> {
    obj.iter()
        .map(|(name, value)| -> Result<(String, CursorValue)> {
            let converted = match schema.and_then(|s| s.get_field(name)) {
                Some(field) => JsonValueWithSchema::new(value, field).to_cursor_value()?,
                None => json_value_to_cursor(value),
            };
            Ok((name.clone(), converted))
        })
        .collect()
}
