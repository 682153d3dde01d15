//! Codec configuration.

use std::path::Path;

use cursor_legacy::TimestampFallback;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Whether a legacy cursor must carry exactly one segment per key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArityPolicy {
    /// Any number of segments is accepted.
    #[default]
    Lenient,
    /// A segment count different from the key count discards the cursor.
    Strict,
}

/// Handling of legacy-format cursors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Whether legacy cursors are decoded at all.
    ///
    /// When `false`, any payload that is not JSON decodes to an empty result.
    pub enabled: bool,

    /// What to do with a `TIME` segment that does not parse.
    pub timestamp_fallback: TimestampFallback,

    /// Segment count validation.
    pub arity: ArityPolicy,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timestamp_fallback: TimestampFallback::Now,
            arity: ArityPolicy::Lenient,
        }
    }
}

/// Configuration for [`CursorDecoder`](crate::CursorDecoder).
///
/// Loaded from YAML; every field is optional:
///
/// ```yaml
/// legacy:
///   enabled: true
///   timestamp_fallback: reject
///   arity: strict
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub legacy: LegacyConfig,
}

impl CodecConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept legacy cursors only when every segment is well formed and the
    /// segment count matches the keys.
    pub fn strict() -> Self {
        Self {
            legacy: LegacyConfig {
                enabled: true,
                timestamp_fallback: TimestampFallback::Reject,
                arity: ArityPolicy::Strict,
            },
        }
    }

    /// Decode current-format cursors only.
    pub fn current_only() -> Self {
        Self {
            legacy: LegacyConfig {
                enabled: false,
                ..LegacyConfig::default()
            },
        }
    }

    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert!(config.legacy.enabled);
        assert_eq!(config.legacy.timestamp_fallback, TimestampFallback::Now);
        assert_eq!(config.legacy.arity, ArityPolicy::Lenient);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = CodecConfig::from_yaml("legacy:\n  arity: strict\n").unwrap();
        assert!(config.legacy.enabled);
        assert_eq!(config.legacy.arity, ArityPolicy::Strict);
        assert_eq!(config.legacy.timestamp_fallback, TimestampFallback::Now);

        assert_eq!(CodecConfig::from_yaml("{}").unwrap(), CodecConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "legacy:\n  enabled: true\n  timestamp_fallback: reject\n  arity: strict\n";
        assert_eq!(CodecConfig::from_yaml(yaml).unwrap(), CodecConfig::strict());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(CodecConfig::from_yaml("legacy:\n  arity: sometimes\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "legacy:\n  enabled: false").unwrap();
        let config = CodecConfig::from_file(file.path()).unwrap();
        assert_eq!(config, CodecConfig::current_only());
    }

    #[test]
    fn test_missing_file() {
        assert!(CodecConfig::from_file("/nonexistent/codec.yaml").is_err());
    }
}
