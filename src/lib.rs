//! pagecursor library
//!
//! Helpers behind the `pagecursor` maintenance CLI: loading schemas and codec
//! configuration, turning JSON objects into rows, and inspecting cursors
//! without a schema.
//!
//! # CLI Usage
//!
//! ```bash
//! # What is in this cursor?
//! pagecursor inspect WzUsImZvbyJd
//!
//! # Typed decode
//! pagecursor decode --schema order.yaml --keys ID,Name WzUsImZvbyJd
//!
//! # Build a cursor from a row
//! pagecursor encode --keys ID,Name '{"ID": 5, "Name": "foo"}'
//!
//! # Rewrite a legacy cursor in the current format
//! pagecursor upgrade --schema order.yaml --keys ID,Name NT9TVFJJTkcsZm9vP1NUUklORw==
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cursor_codec::{CodecConfig, CursorDecoder, CursorEncoder};
use cursor_core::{RecordSchema, Shape};

pub mod inspect;
pub mod row;

pub use inspect::{inspect, render_values};
pub use row::parse_row;

#[derive(Parser, Clone, Debug)]
pub struct CursorOpts {
    /// Key fields, in cursor order (comma separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub keys: Vec<String>,

    /// Record schema file (YAML)
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Codec configuration file (YAML)
    #[arg(long, value_name = "PATH", env = "PAGECURSOR_CONFIG")]
    pub config: Option<PathBuf>,
}

impl CursorOpts {
    /// Load the record schema, if one was given.
    pub fn load_schema(&self) -> anyhow::Result<Option<RecordSchema>> {
        self.schema
            .as_ref()
            .map(|path| {
                RecordSchema::from_file(path)
                    .with_context(|| format!("Failed to load record schema from {path:?}"))
            })
            .transpose()
    }

    /// Load the record schema, failing when none was given.
    pub fn require_schema(&self) -> anyhow::Result<RecordSchema> {
        self.load_schema()?
            .context("A record schema is required for this command (--schema)")
    }

    /// Load the codec configuration, or the defaults.
    pub fn load_config(&self) -> anyhow::Result<CodecConfig> {
        match &self.config {
            Some(path) => CodecConfig::from_file(path)
                .with_context(|| format!("Failed to load codec config from {path:?}")),
            None => Ok(CodecConfig::default()),
        }
    }

    pub fn encoder(&self) -> CursorEncoder {
        CursorEncoder::new(self.keys.iter().cloned())
    }

    pub fn decoder(&self) -> anyhow::Result<CursorDecoder> {
        let schema = self.require_schema()?;
        let config = self.load_config()?;
        let decoder = CursorDecoder::new(&Shape::Record(schema), self.keys.iter().cloned())?;
        Ok(decoder.with_config(config))
    }
}
