//! Value representations for cursor key fields.
//!
//! `CursorValue` is the dynamically-typed value carried in and out of a
//! cursor. The [`Record`] trait is how encoders read key fields off a record,
//! and [`Row`] is a generic record for callers without a concrete type.

use chrono::{DateTime, Utc};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Value of a single cursor key field.
///
/// Decoded values are typed after the schema's field type: a `big_int` field
/// always decodes as `Int64`, a `timestamp` field as `Timestamp`, and so on.
/// `Null` only ever appears for nullable fields.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorValue {
    /// Absent value of a nullable field
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    Int8(i8),
    /// 16-bit signed integer
    Int16(i16),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),

    /// 8-bit unsigned integer
    UInt8(u8),
    /// 16-bit unsigned integer
    UInt16(u16),
    /// 32-bit unsigned integer
    UInt32(u32),
    /// 64-bit unsigned integer
    UInt64(u64),

    /// 32-bit floating point
    Float32(f32),
    /// 64-bit floating point
    Float64(f64),

    /// Text value
    Text(String),

    /// Instant in time (UTC)
    Timestamp(DateTime<Utc>),

    /// UUID value
    Uuid(Uuid),

    /// Binary data
    Bytes(Vec<u8>),

    /// Arbitrary JSON document
    Json(serde_json::Value),

    /// Array of values
    Array(Vec<CursorValue>),

    /// Nested record, fields in declaration order
    Record(Vec<(String, CursorValue)>),
}

impl CursorValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Name of this value's variant, for error messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int8(_) => "tiny_int",
            Self::Int16(_) => "small_int",
            Self::Int32(_) => "int",
            Self::Int64(_) => "big_int",
            Self::UInt8(_) => "tiny_uint",
            Self::UInt16(_) => "small_uint",
            Self::UInt32(_) => "uint",
            Self::UInt64(_) => "big_uint",
            Self::Float32(_) => "float",
            Self::Float64(_) => "double",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamp",
            Self::Uuid(_) => "uuid",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
            Self::Array(_) => "array",
            Self::Record(_) => "record",
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64. Unsigned values that fit are widened.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int8(i) => Some(i64::from(*i)),
            Self::Int16(i) => Some(i64::from(*i)),
            Self::Int32(i) => Some(i64::from(*i)),
            Self::Int64(i) => Some(*i),
            Self::UInt8(u) => Some(i64::from(*u)),
            Self::UInt16(u) => Some(i64::from(*u)),
            Self::UInt32(u) => Some(i64::from(*u)),
            Self::UInt64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Try to get this value as a u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt8(u) => Some(u64::from(*u)),
            Self::UInt16(u) => Some(u64::from(*u)),
            Self::UInt32(u) => Some(u64::from(*u)),
            Self::UInt64(u) => Some(*u),
            other => other.as_i64().and_then(|i| u64::try_from(i).ok()),
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(f) => Some(f64::from(*f)),
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a timestamp.
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(dt) => Some(dt),
            _ => None,
        }
    }

    /// Try to get this value as a UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get this value as an array.
    pub fn as_array(&self) -> Option<&[CursorValue]> {
        match self {
            Self::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Look up a member of a nested record value.
    pub fn get_member(&self, name: &str) -> Option<&CursorValue> {
        match self {
            Self::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for CursorValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i8> for CursorValue {
    fn from(value: i8) -> Self {
        Self::Int8(value)
    }
}

impl From<i16> for CursorValue {
    fn from(value: i16) -> Self {
        Self::Int16(value)
    }
}

impl From<i32> for CursorValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for CursorValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<u8> for CursorValue {
    fn from(value: u8) -> Self {
        Self::UInt8(value)
    }
}

impl From<u16> for CursorValue {
    fn from(value: u16) -> Self {
        Self::UInt16(value)
    }
}

impl From<u32> for CursorValue {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<u64> for CursorValue {
    fn from(value: u64) -> Self {
        Self::UInt64(value)
    }
}

impl From<f32> for CursorValue {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for CursorValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<String> for CursorValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CursorValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for CursorValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Uuid> for CursorValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<serde_json::Value> for CursorValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<CursorValue>> From<Vec<T>> for CursorValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CursorValue>> From<Option<T>> for CursorValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Field access for records that cursors are built from.
///
/// Implementations return the current value of the named field, or `None`
/// when the record has no such field. Values are captured at call time.
///
/// ```rust
/// use cursor_core::{CursorValue, Record};
///
/// struct User {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for User {
///     fn field_value(&self, name: &str) -> Option<CursorValue> {
///         match name {
///             "ID" => Some(self.id.into()),
///             "Name" => Some(self.name.clone().into()),
///             _ => None,
///         }
///     }
/// }
///
/// let user = Box::new(User { id: 5, name: "foo".into() });
/// assert_eq!(user.field_value("ID"), Some(CursorValue::Int64(5)));
/// ```
pub trait Record {
    /// Current value of the named field.
    fn field_value(&self, name: &str) -> Option<CursorValue>;
}

impl<R: Record + ?Sized> Record for &R {
    fn field_value(&self, name: &str) -> Option<CursorValue> {
        (**self).field_value(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field_value(&self, name: &str) -> Option<CursorValue> {
        (**self).field_value(name)
    }
}

impl<R: Record + ?Sized> Record for Rc<R> {
    fn field_value(&self, name: &str) -> Option<CursorValue> {
        (**self).field_value(name)
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn field_value(&self, name: &str) -> Option<CursorValue> {
        (**self).field_value(name)
    }
}

/// Generic record: an ordered list of named values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, CursorValue)>,
}

impl Row {
    /// Create a new row from named values.
    pub fn new(fields: Vec<(String, CursorValue)>) -> Self {
        Self { fields }
    }

    /// Create a new row with a builder pattern.
    pub fn builder() -> RowBuilder {
        RowBuilder { fields: Vec::new() }
    }

    /// Get a field value by name. The first field with that name wins.
    pub fn get_field(&self, name: &str) -> Option<&CursorValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Get the number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CursorValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Record for Row {
    fn field_value(&self, name: &str) -> Option<CursorValue> {
        self.get_field(name).cloned()
    }
}

impl FromIterator<(String, CursorValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CursorValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Builder for `Row`.
pub struct RowBuilder {
    fields: Vec<(String, CursorValue)>,
}

impl RowBuilder {
    /// Add a field to the row.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<CursorValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Build the row.
    pub fn build(self) -> Row {
        Row {
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cursor_value_accessors() {
        assert_eq!(CursorValue::Bool(true).as_bool(), Some(true));
        assert_eq!(CursorValue::Int32(42).as_i64(), Some(42));
        assert_eq!(CursorValue::UInt64(7).as_i64(), Some(7));
        assert_eq!(CursorValue::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(CursorValue::Int16(-1).as_u64(), None);
        assert_eq!(CursorValue::Float32(1.5).as_f64(), Some(1.5));
        assert_eq!(CursorValue::text("foo").as_str(), Some("foo"));
        assert_eq!(CursorValue::Bool(true).as_i64(), None);

        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(CursorValue::Timestamp(ts).as_timestamp(), Some(&ts));

        let id = Uuid::nil();
        assert_eq!(CursorValue::Uuid(id).as_uuid(), Some(&id));
        assert_eq!(CursorValue::text(id.to_string()).as_uuid(), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CursorValue::Null.kind_name(), "null");
        assert_eq!(CursorValue::Int64(5).kind_name(), "big_int");
        assert_eq!(CursorValue::UInt8(5).kind_name(), "tiny_uint");
        assert_eq!(CursorValue::Float64(1.0).kind_name(), "double");
        assert_eq!(CursorValue::text("foo").kind_name(), "text");
        assert_eq!(CursorValue::Record(Vec::new()).kind_name(), "record");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(CursorValue::from(5i64), CursorValue::Int64(5));
        assert_eq!(CursorValue::from("foo"), CursorValue::Text("foo".to_string()));
        assert_eq!(CursorValue::from(None::<i32>), CursorValue::Null);
        assert_eq!(CursorValue::from(Some(3u8)), CursorValue::UInt8(3));
        assert_eq!(
            CursorValue::from(vec![1i32, 2]),
            CursorValue::Array(vec![CursorValue::Int32(1), CursorValue::Int32(2)])
        );
    }

    #[test]
    fn test_record_member_lookup() {
        let value = CursorValue::Record(vec![
            ("amount".to_string(), CursorValue::Int64(100)),
            ("currency".to_string(), CursorValue::text("EUR")),
        ]);
        assert_eq!(value.get_member("currency"), Some(&CursorValue::text("EUR")));
        assert_eq!(value.get_member("missing"), None);
        assert_eq!(CursorValue::Null.get_member("amount"), None);
    }

    #[test]
    fn test_row_builder() {
        let row = Row::builder()
            .field("ID", 5i64)
            .field("Name", "foo")
            .field("DeletedAt", None::<DateTime<Utc>>)
            .build();

        assert_eq!(row.field_count(), 3);
        assert_eq!(row.get_field("ID"), Some(&CursorValue::Int64(5)));
        assert_eq!(row.field_value("Name"), Some(CursorValue::text("foo")));
        assert_eq!(row.field_value("DeletedAt"), Some(CursorValue::Null));
        assert_eq!(row.field_value("Missing"), None);

        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["ID", "Name", "DeletedAt"]);
    }

    #[test]
    fn test_record_through_references() {
        let row = Row::builder().field("ID", 1i64).build();

        let boxed: Box<Row> = Box::new(row.clone());
        let shared: Arc<Box<Row>> = Arc::new(Box::new(row.clone()));
        let borrowed: &&Row = &&row;

        assert_eq!(boxed.field_value("ID"), Some(CursorValue::Int64(1)));
        assert_eq!(shared.field_value("ID"), Some(CursorValue::Int64(1)));
        assert_eq!(borrowed.field_value("ID"), Some(CursorValue::Int64(1)));
    }
}
