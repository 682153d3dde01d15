//! Command-line interface for pagecursor
//!
//! # Usage Examples
//!
//! ## Inspect
//! ```bash
//! pagecursor inspect WzUsImZvbyJd
//! # format: current
//! # values: [5,"foo"]
//! ```
//!
//! ## Typed decode
//! ```bash
//! pagecursor decode --schema order.yaml --keys ID,Name WzUsImZvbyJd
//! ```
//!
//! ## Encode
//! ```bash
//! pagecursor encode --keys ID,Name '{"ID": 5, "Name": "foo"}'
//!
//! # Legacy fixture for compatibility tests
//! pagecursor encode-legacy --keys ID,PlacedAt '{"ID": 5, "PlacedAt": "2024-01-02T15:04:05Z"}' \
//!   --schema order.yaml
//! ```
//!
//! ## Upgrade
//! ```bash
//! pagecursor upgrade --schema order.yaml --keys ID,Name NT9TVFJJTkcsZm9vP1NUUklORw==
//! ```
//!
//! Set `RUST_LOG=debug` to see how each cursor was dispatched.

use anyhow::Context;
use clap::{Parser, Subcommand};
use cursor_codec::{upgrade_legacy, Decoded, Upgrade};
use pagecursor::{inspect, parse_row, render_values, CursorOpts};

#[derive(Parser)]
#[command(name = "pagecursor")]
#[command(about = "Inspect, encode, decode and upgrade pagination cursors")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the format and values of a cursor without a schema
    Inspect {
        /// The cursor
        cursor: String,
    },

    /// Decode a cursor with a record schema
    Decode {
        #[command(flatten)]
        opts: CursorOpts,

        /// The cursor
        cursor: String,
    },

    /// Encode a JSON object row as a cursor
    Encode {
        #[command(flatten)]
        opts: CursorOpts,

        /// The row, as a JSON object
        row: String,
    },

    /// Encode a JSON object row in the legacy format
    EncodeLegacy {
        #[command(flatten)]
        opts: CursorOpts,

        /// The row, as a JSON object
        row: String,
    },

    /// Rewrite a legacy cursor in the current format
    Upgrade {
        #[command(flatten)]
        opts: CursorOpts,

        /// The cursor
        cursor: String,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { cursor } => {
            let decoded = inspect(&cursor)?;
            print_decoded(&decoded)?;
        }
        Commands::Decode { opts, cursor } => {
            let decoder = opts.decoder()?;
            let decoded = decoder
                .decode_detailed(&cursor)
                .context("Failed to decode cursor")?;
            print_decoded(&decoded)?;
        }
        Commands::Encode { opts, row } => {
            let schema = opts.load_schema()?;
            let row = parse_row(&row, schema.as_ref())?;
            let cursor = opts.encoder().encode(&row).context("Failed to encode row")?;
            println!("{cursor}");
        }
        Commands::EncodeLegacy { opts, row } => {
            let schema = opts.load_schema()?;
            let row = parse_row(&row, schema.as_ref())?;
            let cursor = opts
                .encoder()
                .encode_legacy(&row)
                .context("Failed to encode row")?;
            println!("{cursor}");
        }
        Commands::Upgrade { opts, cursor } => {
            let decoder = opts.decoder()?;
            match upgrade_legacy(&decoder, &opts.encoder(), &cursor)
                .context("Failed to upgrade cursor")?
            {
                Upgrade::Upgraded(upgraded) => println!("{upgraded}"),
                Upgrade::AlreadyCurrent => {
                    tracing::info!("Cursor is already in the current format");
                    println!("{cursor}");
                }
                Upgrade::Discarded(reason) => {
                    anyhow::bail!("Cursor cannot be upgraded: {reason}")
                }
            }
        }
    }

    Ok(())
}

fn print_decoded(decoded: &Decoded) -> anyhow::Result<()> {
    match decoded {
        Decoded::Empty(reason) => {
            println!("format: none ({reason})");
            println!("values: []");
        }
        _ => {
            if let Some(format) = decoded.format() {
                println!("format: {format}");
            }
            println!("values: {}", render_values(decoded.values())?);
        }
    }
    Ok(())
}
