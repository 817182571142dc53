//! Internal key inspection tool
//!
//! Encodes, decodes and compares internal key records as hex.

use std::cmp::Ordering;

use atlaskv_format::comparator::sign;
use atlaskv_format::{
    compare_internal_keys, InternalKey, KeyFormatError, LookupKey, Result, ValueType,
};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Internal key tool
#[derive(Parser, Debug)]
#[command(name = "keytool")]
#[command(about = "Encode, decode and compare AtlasKV internal keys")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a write into a record
    Encode {
        /// Sequence number (at most 2^56 - 1)
        #[arg(short, long)]
        seq: u64,

        /// Encode a tombstone instead of a value
        #[arg(short, long)]
        delete: bool,

        /// The user key
        #[arg(short, long)]
        key: String,

        /// The value (ignored for deletes)
        #[arg(short, long, default_value = "")]
        value: String,
    },

    /// Build a lookup probe
    Lookup {
        /// The user key
        #[arg(short, long)]
        key: String,

        /// Snapshot sequence (defaults to newest)
        #[arg(short, long)]
        seq: Option<u64>,
    },

    /// Decode a hex-encoded record
    Decode {
        /// Record bytes as hex
        hex: String,
    },

    /// Compare two hex-encoded records, printing -1, 0 or 1
    Compare {
        /// First record as hex
        left: String,

        /// Second record as hex
        right: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlaskv_format=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Encode {
            seq,
            delete,
            key,
            value,
        } => {
            let record = if delete {
                InternalKey::encode(seq, ValueType::Deletion, key.as_bytes(), &[])?
            } else {
                InternalKey::encode(seq, ValueType::Value, key.as_bytes(), value.as_bytes())?
            };
            println!("{}", to_hex(record.encoded()));
            print_record(&record);
        }
        Commands::Lookup { key, seq } => {
            let probe = match seq {
                Some(seq) => LookupKey::at_snapshot(key.as_bytes(), seq)?,
                None => LookupKey::new(key.as_bytes())?,
            };
            println!("{}", to_hex(probe.encoded()));
            println!("user_key  {}", String::from_utf8_lossy(probe.user_key()));
            println!("sequence  {}", probe.sequence());
        }
        Commands::Decode { hex } => {
            let record = InternalKey::from_encoded(from_hex(&hex)?)?;
            print_record(&record);
        }
        Commands::Compare { left, right } => {
            let left = InternalKey::from_encoded(from_hex(&left)?)?;
            let right = InternalKey::from_encoded(from_hex(&right)?)?;
            let ordering: Ordering = compare_internal_keys(&left, &right);
            println!("{}", sign(ordering));
        }
    }

    Ok(())
}

fn print_record(record: &InternalKey) {
    println!("user_key  {}", String::from_utf8_lossy(record.user_key()));
    println!("sequence  {}", record.sequence());
    println!("type      {:?}", record.value_type());
    println!("value     {}", String::from_utf8_lossy(record.user_value()));
    println!("size      {} bytes", record.encoded_len());
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(hex: &str) -> Result<Bytes> {
    let hex = hex.trim();
    if !hex.is_ascii() || hex.len() % 2 != 0 {
        return Err(KeyFormatError::Corruption(format!(
            "hex input must be an even number of ASCII digits, got {} bytes",
            hex.len()
        )));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| {
                KeyFormatError::Corruption(format!("invalid hex at offset {}: {}", i, e))
            })
        })
        .collect::<Result<Vec<u8>>>()
        .map(Bytes::from)
}
