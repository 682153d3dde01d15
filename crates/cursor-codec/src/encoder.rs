//! Cursor encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cursor_core::{CursorValue, Record};

use crate::error::{CursorError, Result};

/// Encodes the key fields of a record into an opaque cursor.
///
/// The cursor is the standard base64 encoding of a JSON array holding one
/// element per key, in key order. Keys are not checked against any schema;
/// a key the record does not have fails at encode time.
#[derive(Debug, Clone)]
pub struct CursorEncoder {
    keys: Vec<String>,
}

impl CursorEncoder {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Read the key values from a record, in key order.
    pub fn extract<R: Record + ?Sized>(&self, record: &R) -> Result<Vec<CursorValue>> {
        self.keys
            .iter()
            .map(|key| {
                record
                    .field_value(key)
                    .ok_or_else(|| CursorError::FieldNotFound { field: key.clone() })
            })
            .collect()
    }

    /// Encode a record's key values as a current-format cursor.
    pub fn encode<R: Record + ?Sized>(&self, record: &R) -> Result<String> {
        let values = self.extract(record)?;
        self.encode_values(&values)
    }

    /// Encode already extracted values, one per key.
    pub fn encode_values(&self, values: &[CursorValue]) -> Result<String> {
        self.check_count(values)?;

        let elements = self
            .keys
            .iter()
            .zip(values)
            .map(|(key, value)| {
                cursor_json::to_json(value).map_err(|source| CursorError::Json {
                    field: key.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let payload = serde_json::to_vec(&serde_json::Value::Array(elements))?;
        Ok(STANDARD.encode(payload))
    }

    /// Encode a record in the legacy `value?KIND` format.
    ///
    /// Only for producing fixtures and talking to peers that predate the JSON
    /// format; [`encode`](Self::encode) never emits this.
    pub fn encode_legacy<R: Record + ?Sized>(&self, record: &R) -> Result<String> {
        let values = self.extract(record)?;
        self.encode_legacy_values(&values)
    }

    /// Encode already extracted values in the legacy format.
    pub fn encode_legacy_values(&self, values: &[CursorValue]) -> Result<String> {
        self.check_count(values)?;
        Ok(STANDARD.encode(cursor_legacy::encode_payload(values)))
    }

    fn check_count(&self, values: &[CursorValue]) -> Result<()> {
        if values.len() != self.keys.len() {
            return Err(CursorError::ElementCount {
                expected: self.keys.len(),
                found: values.len(),
            });
        }
        Ok(())
    }
}
