//! Cursor decoding.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cursor_core::{CursorValue, Describe, RecordSchema, Shape};
use cursor_json::JsonValueWithSchema;
use tracing::{debug, warn};

use crate::config::{ArityPolicy, CodecConfig};
use crate::error::{CursorError, Result};

/// Wire format a cursor was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorFormat {
    /// Base64 of a JSON array.
    Current,
    /// Base64 of comma-joined `value?KIND` segments.
    Legacy,
}

impl fmt::Display for CursorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Why a cursor decoded to no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Not valid base64.
    InvalidTransport,
    /// A legacy segment was missing its kind, or its timestamp was rejected.
    MalformedLegacy,
    /// Legacy decoding is turned off.
    LegacyDisabled,
    /// Legacy segment count differs from the key count under strict arity.
    LegacyArityMismatch,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InvalidTransport => "cursor is not valid base64",
            Self::MalformedLegacy => "legacy cursor is malformed",
            Self::LegacyDisabled => "legacy cursors are disabled",
            Self::LegacyArityMismatch => "legacy cursor does not match the key count",
        };
        f.write_str(reason)
    }
}

/// Outcome of decoding a cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Values from a current-format cursor, typed by the schema.
    Current(Vec<CursorValue>),
    /// Values from a legacy cursor: `Text` and `Timestamp` only.
    Legacy(Vec<CursorValue>),
    /// The cursor was discarded; treat as "start from the beginning".
    Empty(EmptyReason),
}

impl Decoded {
    pub fn values(&self) -> &[CursorValue] {
        match self {
            Self::Current(values) | Self::Legacy(values) => values,
            Self::Empty(_) => &[],
        }
    }

    pub fn into_values(self) -> Vec<CursorValue> {
        match self {
            Self::Current(values) | Self::Legacy(values) => values,
            Self::Empty(_) => Vec::new(),
        }
    }

    /// Format the values were read from, `None` when discarded.
    pub fn format(&self) -> Option<CursorFormat> {
        match self {
            Self::Current(_) => Some(CursorFormat::Current),
            Self::Legacy(_) => Some(CursorFormat::Legacy),
            Self::Empty(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

/// Decodes cursors into key values typed by a record schema.
///
/// The schema is resolved once at construction from a [`Shape`], which may be
/// the record itself, a reference to it, or a collection of it. Keys are
/// looked up in the schema only when a current-format cursor is decoded.
#[derive(Debug, Clone)]
pub struct CursorDecoder {
    schema: RecordSchema,
    keys: Vec<String>,
    config: CodecConfig,
}

impl CursorDecoder {
    pub fn new<I, S>(shape: &Shape, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = shape.reduce()?.clone();
        Ok(Self {
            schema,
            keys: keys.into_iter().map(Into::into).collect(),
            config: CodecConfig::default(),
        })
    }

    /// Create a decoder for the record described by `T`.
    pub fn for_type<T: Describe + ?Sized>(
        keys: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        Self::new(&T::shape(), keys)
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a cursor into one value per key.
    ///
    /// A discarded cursor yields an empty vector.
    pub fn decode(&self, cursor: &str) -> Result<Vec<CursorValue>> {
        Ok(self.decode_detailed(cursor)?.into_values())
    }

    /// Decode a cursor, reporting which format it was in or why it was
    /// discarded.
    pub fn decode_detailed(&self, cursor: &str) -> Result<Decoded> {
        let bytes = match STANDARD.decode(cursor) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Discarding cursor that is not valid base64: {e}");
                return Ok(Decoded::Empty(EmptyReason::InvalidTransport));
            }
        };

        // Invalid UTF-8 is replaced before the JSON check, so a JSON array
        // carrying such bytes inside a string still takes the current path.
        let text = String::from_utf8_lossy(&bytes);
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(payload) => {
                debug!("Decoding current-format cursor for {}", self.schema.name());
                self.decode_current(&payload).map(Decoded::Current)
            }
            Err(_) => self.decode_legacy(&text),
        }
    }

    fn decode_current(&self, payload: &serde_json::Value) -> Result<Vec<CursorValue>> {
        let elements = payload.as_array().ok_or_else(|| CursorError::NotAnArray {
            found: json_kind(payload).to_string(),
        })?;

        if elements.len() < self.keys.len() {
            return Err(CursorError::ElementCount {
                expected: self.keys.len(),
                found: elements.len(),
            });
        }

        self.keys
            .iter()
            .zip(elements)
            .map(|(key, element)| {
                let field = self
                    .schema
                    .get_field(key)
                    .ok_or_else(|| CursorError::FieldNotFound { field: key.clone() })?;
                JsonValueWithSchema::new(element, field)
                    .to_cursor_value()
                    .map_err(|source| CursorError::Json {
                        field: key.clone(),
                        source,
                    })
            })
            .collect()
    }

    fn decode_legacy(&self, payload: &str) -> Result<Decoded> {
        let legacy = &self.config.legacy;
        if !legacy.enabled {
            debug!("Discarding non-JSON cursor, legacy decoding is disabled");
            return Ok(Decoded::Empty(EmptyReason::LegacyDisabled));
        }

        debug!("Decoding legacy cursor for {}", self.schema.name());
        let values = match cursor_legacy::decode_payload(payload, legacy.timestamp_fallback) {
            Ok(values) => values,
            Err(e) => {
                debug!("Discarding malformed legacy cursor: {e}");
                return Ok(Decoded::Empty(EmptyReason::MalformedLegacy));
            }
        };

        if values.len() != self.keys.len() {
            warn!(
                "Legacy cursor has {} segments for {} keys",
                values.len(),
                self.keys.len()
            );
            if legacy.arity == ArityPolicy::Strict {
                return Ok(Decoded::Empty(EmptyReason::LegacyArityMismatch));
            }
        }

        Ok(Decoded::Legacy(values))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
