//! Field types for cursor key fields.
//!
//! This module defines `FieldType`, the set of declared types a record field
//! can have when it participates in a cursor. The type drives how a value is
//! decoded back out of a cursor payload.

use crate::schema::RecordSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Declared type of a record field.
///
/// # YAML Format
///
/// Simple types can be specified as strings:
/// ```yaml
/// type: big_int
/// type: text
/// type: timestamp
/// ```
///
/// Complex types use object format:
/// ```yaml
/// type:
///   type: array
///   element_type: int
/// type:
///   type: record
///   name: Money
///   fields:
///     - name: amount
///       type: big_int
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    // Boolean
    /// Boolean value
    Bool,

    // Signed integers
    /// 8-bit signed integer
    Int8,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,

    // Unsigned integers
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit unsigned integer
    UInt64,

    // Floating point
    /// 32-bit IEEE 754 floating point
    Float32,
    /// 64-bit IEEE 754 floating point
    Float64,

    /// UTF-8 text
    Text,

    /// Instant in time, normalized to UTC
    Timestamp,

    /// UUID (128-bit)
    Uuid,

    /// Raw bytes, base64 in JSON
    Bytes,

    /// Arbitrary JSON document
    Json,

    /// Homogeneous array
    Array {
        /// Element type
        element_type: Box<FieldType>,
    },

    /// Nested record (struct-typed field)
    Record(RecordSchema),
}

impl FieldType {
    /// Create a new Array type with the given element type.
    pub fn array(element_type: FieldType) -> Self {
        Self::Array {
            element_type: Box::new(element_type),
        }
    }

    /// Stable name of this type, as used in schema files and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "tiny_int",
            Self::Int16 => "small_int",
            Self::Int32 => "int",
            Self::Int64 => "big_int",
            Self::UInt8 => "tiny_uint",
            Self::UInt16 => "small_uint",
            Self::UInt32 => "uint",
            Self::UInt64 => "big_uint",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Uuid => "uuid",
            Self::Bytes => "bytes",
            Self::Json => "json",
            Self::Array { .. } => "array",
            Self::Record(_) => "record",
        }
    }

    /// Check if this type represents a numeric type.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Float32 | Self::Float64)
    }

    /// Check if this type represents an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Check if this type represents a string type.
    pub fn is_string(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// Check if this type represents a temporal type.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Timestamp)
    }

    fn from_simple_name(name: &str) -> Option<Self> {
        let ty = match name {
            "bool" => Self::Bool,
            "tiny_int" | "tinyint" | "i8" => Self::Int8,
            "small_int" | "smallint" | "i16" => Self::Int16,
            "int" | "i32" => Self::Int32,
            "big_int" | "bigint" | "i64" => Self::Int64,
            "tiny_uint" | "u8" => Self::UInt8,
            "small_uint" | "u16" => Self::UInt16,
            "uint" | "u32" => Self::UInt32,
            "big_uint" | "u64" => Self::UInt64,
            "float" | "f32" => Self::Float32,
            "double" | "f64" => Self::Float64,
            "text" | "string" => Self::Text,
            "timestamp" | "date_time" | "datetime" => Self::Timestamp,
            "uuid" => Self::Uuid,
            "bytes" => Self::Bytes,
            "json" => Self::Json,
            _ => return None,
        };
        Some(ty)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Array { element_type } => write!(f, "array<{element_type}>"),
            Self::Record(schema) => write!(f, "record {}", schema.name()),
            other => f.write_str(other.name()),
        }
    }
}

// Simple types serialize as a bare string ("big_int"), complex types as a map
// ({"type": "array", "element_type": "int"}).

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            Self::Array { element_type } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("element_type", element_type)?;
                map.end()
            }
            Self::Record(schema) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "record")?;
                map.serialize_entry("name", schema.name())?;
                map.serialize_entry("fields", schema.fields())?;
                map.end()
            }
            simple => serializer.serialize_str(simple.name()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, MapAccess, Visitor};

        struct FieldTypeVisitor;

        impl<'de> Visitor<'de> for FieldTypeVisitor {
            type Value = FieldType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string or map representing a FieldType")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                FieldType::from_simple_name(value)
                    .ok_or_else(|| E::custom(format!("unknown simple type: {value}")))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut type_name: Option<String> = None;
                let mut fields: HashMap<String, serde_yaml::Value> = HashMap::new();

                while let Some(key) = map.next_key::<String>()? {
                    if key == "type" {
                        type_name = Some(map.next_value()?);
                    } else {
                        fields.insert(key, map.next_value()?);
                    }
                }

                let type_name = type_name.ok_or_else(|| M::Error::missing_field("type"))?;

                match type_name.as_str() {
                    "array" => {
                        let element_type: FieldType =
                            get_field_required(&fields, "element_type")?;
                        Ok(FieldType::array(element_type))
                    }
                    "record" => {
                        let name: String =
                            get_field_optional(&fields, "name")?.unwrap_or_default();
                        let record_fields = get_field_required(&fields, "fields")?;
                        Ok(FieldType::Record(RecordSchema::new(name, record_fields)))
                    }
                    simple => FieldType::from_simple_name(simple)
                        .ok_or_else(|| M::Error::custom(format!("unknown type: {type_name}"))),
                }
            }
        }

        deserializer.deserialize_any(FieldTypeVisitor)
    }
}

fn get_field_optional<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<Option<T>, E> {
    fields
        .get(key)
        .map(|value| {
            serde_yaml::from_value(value.clone())
                .map_err(|e| E::custom(format!("invalid field '{key}': {e}")))
        })
        .transpose()
}

fn get_field_required<T: for<'de> Deserialize<'de>, E: serde::de::Error>(
    fields: &HashMap<String, serde_yaml::Value>,
    key: &'static str,
) -> Result<T, E> {
    get_field_optional(fields, key)?.ok_or_else(|| E::missing_field(key))
}
