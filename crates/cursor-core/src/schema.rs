//! Record schemas for cursor encoding and decoding.
//!
//! ## Type Hierarchy
//!
//! - `FieldSchema` - Single field metadata (name, declared type, nullability)
//! - `RecordSchema` - A record type with its fields, indexed by name
//! - `Shape` - The shape of a schema reference: a record, possibly wrapped in
//!   any number of reference or collection layers
//!
//! ## Usage
//!
//! Decoders are built from a `Shape`, which is reduced to its `RecordSchema`
//! once at construction. Rust types opt in through the [`Describe`] trait;
//! schemas can also be assembled with [`RecordSchema::builder`] or loaded from
//! YAML files.

use crate::types::FieldType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema reference does not reduce to a record
    #[error("Decode reference should be a record, found {found}")]
    InvalidReference { found: String },

    /// Field not found in record schema
    #[error("Cannot find field '{field}' in record '{record}'")]
    FieldNotFound { record: String, field: String },

    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

// ============================================================================
// Field and Record Schemas
// ============================================================================

/// Field definition within a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    /// Field name
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field holds an optional value (`Option<T>`) rather than a
    /// plain `T`
    #[serde(default)]
    pub nullable: bool,
}

impl FieldSchema {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
        }
    }

    /// Create a new nullable field definition.
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: true,
        }
    }

    /// Derive a field definition from a Rust type's shape.
    pub fn of<T: Describe + ?Sized>(name: impl Into<String>) -> Self {
        T::shape().to_field_schema(name)
    }
}

/// On-disk form of a record schema.
#[derive(Deserialize)]
struct RecordSchemaFile {
    #[serde(default)]
    name: String,
    fields: Vec<FieldSchema>,
}

impl From<RecordSchemaFile> for RecordSchema {
    fn from(file: RecordSchemaFile) -> Self {
        RecordSchema::new(file.name, file.fields)
    }
}

/// Record type description.
///
/// Read-only after construction. Field lookup by name is backed by an index
/// built once, so decoding never scans the field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RecordSchemaFile")]
pub struct RecordSchema {
    /// Record name
    name: String,

    /// Field definitions in declaration order
    fields: Vec<FieldSchema>,

    /// Cached field lookup (not serialized)
    #[serde(skip)]
    field_map: HashMap<String, usize>,
}

impl PartialEq for RecordSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl RecordSchema {
    /// Create a new record schema from a list of field definitions.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        let mut schema = Self {
            name: name.into(),
            fields,
            field_map: HashMap::new(),
        };
        schema.build_field_map();
        schema
    }

    /// Start building a record schema.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Load a record schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a record schema from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build the internal field lookup map. The first definition of a
    /// duplicated name wins.
    fn build_field_map(&mut self) {
        self.field_map.clear();
        for (idx, field) in self.fields.iter().enumerate() {
            self.field_map.entry(field.name.clone()).or_insert(idx);
        }
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field definitions in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.field_map
            .get(name)
            .and_then(|&idx| self.fields.get(idx))
    }

    /// Get a field by name, failing with `FieldNotFound`.
    pub fn require_field(&self, name: &str) -> Result<&FieldSchema, SchemaError> {
        self.get_field(name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                record: self.name.clone(),
                field: name.to_string(),
            })
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Builder for `RecordSchema`.
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldSchema>,
}

impl RecordSchemaBuilder {
    /// Add a non-nullable field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSchema::new(name, field_type));
        self
    }

    /// Add a nullable field.
    pub fn nullable_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldSchema::nullable(name, field_type));
        self
    }

    /// Add a field whose definition is derived from a Rust type.
    pub fn describe<T: Describe + ?Sized>(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldSchema::of::<T>(name));
        self
    }

    /// Build the record schema.
    pub fn build(self) -> RecordSchema {
        RecordSchema::new(self.name, self.fields)
    }
}

// ============================================================================
// Shapes
// ============================================================================

/// Shape of a schema reference.
///
/// A decoder is told about its record type through a shape, which may wrap
/// the record in any number of reference (`Box<T>`, `&T`, `Option<T>`) or
/// collection (`Vec<T>`) layers.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A record type
    Record(RecordSchema),

    /// Reference to (or optional) inner shape
    Reference(Box<Shape>),

    /// Collection of inner shape
    Collection(Box<Shape>),

    /// Key/value mapping
    Map { key: Box<Shape>, value: Box<Shape> },

    /// Scalar value
    Scalar(FieldType),
}

impl Shape {
    /// Shape of the Rust type `T`.
    pub fn of<T: Describe + ?Sized>() -> Self {
        T::shape()
    }

    /// Wrap a shape in a reference layer.
    pub fn reference(inner: Shape) -> Self {
        Self::Reference(Box::new(inner))
    }

    /// Wrap a shape in a collection layer.
    pub fn collection(inner: Shape) -> Self {
        Self::Collection(Box::new(inner))
    }

    /// Short description of the outermost layer.
    pub fn kind(&self) -> String {
        match self {
            Self::Record(schema) => format!("record {}", schema.name()),
            Self::Reference(_) => "reference".to_string(),
            Self::Collection(_) => "collection".to_string(),
            Self::Map { .. } => "map".to_string(),
            Self::Scalar(ty) => ty.to_string(),
        }
    }

    /// Unwrap reference and collection layers until a record is reached.
    pub fn reduce(&self) -> Result<&RecordSchema, SchemaError> {
        let mut current = self;
        loop {
            match current {
                Self::Reference(inner) | Self::Collection(inner) => current = &**inner,
                Self::Record(schema) | Self::Scalar(FieldType::Record(schema)) => {
                    return Ok(schema)
                }
                other => {
                    return Err(SchemaError::InvalidReference {
                        found: other.kind(),
                    })
                }
            }
        }
    }

    /// Field definition for a field of this shape. Reference layers make the
    /// field nullable; collections become arrays and maps become JSON.
    pub fn to_field_schema(&self, name: impl Into<String>) -> FieldSchema {
        match self {
            Self::Reference(inner) => {
                let mut field = inner.to_field_schema(name);
                field.nullable = true;
                field
            }
            other => FieldSchema::new(name, other.to_field_type()),
        }
    }

    fn to_field_type(&self) -> FieldType {
        match self {
            Self::Record(schema) => FieldType::Record(schema.clone()),
            Self::Reference(inner) => inner.to_field_type(),
            Self::Collection(inner) => FieldType::array(inner.to_field_type()),
            Self::Map { .. } => FieldType::Json,
            Self::Scalar(ty) => ty.clone(),
        }
    }
}

/// Types that can describe their own shape.
///
/// Record types implement this by returning [`Shape::Record`]; the
/// implementations below cover scalars, references, collections and maps.
///
/// ```rust
/// use cursor_core::{Describe, FieldType, RecordSchema, Shape};
///
/// struct User;
///
/// impl Describe for User {
///     fn shape() -> Shape {
///         Shape::Record(
///             RecordSchema::builder("User")
///                 .field("ID", FieldType::Int64)
///                 .field("Name", FieldType::Text)
///                 .build(),
///         )
///     }
/// }
///
/// assert!(Shape::of::<Vec<Box<User>>>().reduce().is_ok());
/// assert!(Shape::of::<i64>().reduce().is_err());
/// ```
pub trait Describe {
    /// Shape of this type.
    fn shape() -> Shape;
}

macro_rules! describe_scalar {
    ($($ty:ty => $field_type:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    Shape::Scalar($field_type)
                }
            }
        )*
    };
}

describe_scalar! {
    bool => FieldType::Bool,
    i8 => FieldType::Int8,
    i16 => FieldType::Int16,
    i32 => FieldType::Int32,
    i64 => FieldType::Int64,
    u8 => FieldType::UInt8,
    u16 => FieldType::UInt16,
    u32 => FieldType::UInt32,
    u64 => FieldType::UInt64,
    f32 => FieldType::Float32,
    f64 => FieldType::Float64,
    str => FieldType::Text,
    String => FieldType::Text,
    DateTime<Utc> => FieldType::Timestamp,
    uuid::Uuid => FieldType::Uuid,
    serde_json::Value => FieldType::Json,
}

impl<T: Describe + ?Sized> Describe for &T {
    fn shape() -> Shape {
        Shape::reference(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn shape() -> Shape {
        Shape::reference(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Rc<T> {
    fn shape() -> Shape {
        Shape::reference(T::shape())
    }
}

impl<T: Describe + ?Sized> Describe for Arc<T> {
    fn shape() -> Shape {
        Shape::reference(T::shape())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::reference(T::shape())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::collection(T::shape())
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        Shape::collection(T::shape())
    }
}

impl<T: Describe> Describe for [T] {
    fn shape() -> Shape {
        Shape::collection(T::shape())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        Shape::collection(T::shape())
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map {
            key: Box::new(K::shape()),
            value: Box::new(V::shape()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct User;

    impl Describe for User {
        fn shape() -> Shape {
            Shape::Record(user_schema())
        }
    }

    fn user_schema() -> RecordSchema {
        RecordSchema::builder("User")
            .field("ID", FieldType::Int64)
            .field("Name", FieldType::Text)
            .describe::<Option<DateTime<Utc>>>("DeletedAt")
            .build()
    }

    #[test]
    fn test_record_schema_get_field() {
        let schema = user_schema();

        let id = schema.get_field("ID").expect("ID should exist");
        assert_eq!(id.field_type, FieldType::Int64);
        assert!(!id.nullable);

        let deleted_at = schema.get_field("DeletedAt").expect("DeletedAt should exist");
        assert_eq!(deleted_at.field_type, FieldType::Timestamp);
        assert!(deleted_at.nullable);

        assert!(schema.get_field("nonexistent").is_none());
        assert_eq!(schema.field_names(), vec!["ID", "Name", "DeletedAt"]);
    }

    #[test]
    fn test_require_field_not_found() {
        let schema = user_schema();
        let err = schema.require_field("Email").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::FieldNotFound { ref record, ref field } if record == "User" && field == "Email"
        ));
    }

    #[test]
    fn test_duplicate_field_first_wins() {
        let schema = RecordSchema::new(
            "Dup",
            vec![
                FieldSchema::new("a", FieldType::Int32),
                FieldSchema::new("a", FieldType::Text),
            ],
        );
        assert_eq!(schema.get_field("a").unwrap().field_type, FieldType::Int32);
    }

    #[test]
    fn test_reduce_record_shapes() {
        let expected = user_schema();

        assert_eq!(Shape::of::<User>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<Box<User>>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<Box<Box<User>>>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<&Arc<User>>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<Vec<User>>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<Vec<Option<Rc<User>>>>().reduce().unwrap(), &expected);
        assert_eq!(Shape::of::<[User]>().reduce().unwrap(), &expected);
    }

    #[test]
    fn test_reduce_invalid_reference() {
        for shape in [
            Shape::of::<i64>(),
            Shape::of::<Box<String>>(),
            Shape::of::<Vec<u8>>(),
            Shape::of::<HashMap<String, User>>(),
            Shape::of::<Vec<BTreeMap<String, i64>>>(),
        ] {
            let err = shape.reduce().unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidReference { .. }),
                "expected InvalidReference for {shape:?}"
            );
        }
    }

    #[test]
    fn test_field_schema_from_shape() {
        assert_eq!(
            FieldSchema::of::<Vec<i32>>("ids"),
            FieldSchema::new("ids", FieldType::array(FieldType::Int32))
        );
        assert_eq!(
            FieldSchema::of::<Option<Box<String>>>("nick"),
            FieldSchema::nullable("nick", FieldType::Text)
        );
        assert_eq!(
            FieldSchema::of::<HashMap<String, i64>>("tags"),
            FieldSchema::new("tags", FieldType::Json)
        );
    }

    const SAMPLE_SCHEMA: &str = r#"
name: Order
fields:
  - name: id
    type: big_uint
  - name: created_at
    type: timestamp
  - name: note
    type: text
    nullable: true
  - name: total
    type:
      type: record
      name: Money
      fields:
        - name: amount
          type: big_int
        - name: currency
          type: text
"#;

    #[test]
    fn test_parse_yaml_schema() {
        let schema = RecordSchema::from_yaml(SAMPLE_SCHEMA).unwrap();

        assert_eq!(schema.name(), "Order");
        assert_eq!(schema.fields().len(), 4);
        assert_eq!(schema.get_field("id").unwrap().field_type, FieldType::UInt64);
        assert!(schema.get_field("note").unwrap().nullable);

        let FieldType::Record(money) = &schema.get_field("total").unwrap().field_type else {
            panic!("total should be a record");
        };
        assert_eq!(money.get_field("amount").unwrap().field_type, FieldType::Int64);
    }

    #[test]
    fn test_load_schema_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_SCHEMA.as_bytes()).unwrap();

        let schema = RecordSchema::from_file(file.path()).unwrap();
        assert_eq!(schema.field_names(), vec!["id", "created_at", "note", "total"]);
    }

    #[test]
    fn test_load_schema_missing_file() {
        let result = RecordSchema::from_file("/nonexistent/schema.yaml");
        assert!(matches!(result, Err(SchemaError::IoError(_))));
    }

    #[test]
    fn test_invalid_yaml_schema() {
        let result = RecordSchema::from_yaml("fields: [{name: a, type: decimal}]");
        assert!(matches!(result, Err(SchemaError::YamlError(_))));
    }
}
