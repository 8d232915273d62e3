//! Command line argument parsing for the Termsmith CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Termsmith - order-preserving document to index-term conversion
#[derive(Parser, Debug, Clone)]
#[command(name = "termsmith")]
#[command(about = "Convert documents into order-preserving index terms")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TermsmithArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TermsmithArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert JSON Lines documents into index entries
    Convert(ConvertArgs),

    /// Encode a single value into its index term
    Encode(EncodeArgs),
}

/// Arguments for converting documents
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Document file path (JSONL, one object per line)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document_file: PathBuf,

    /// Field catalog definition file (JSON)
    #[arg(long, value_name = "FIELDS_FILE")]
    pub fields: PathBuf,

    /// Converter configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Document key holding the document id
    #[arg(long, default_value = "id")]
    pub id_key: String,

    /// Document key holding the source document id
    #[arg(long)]
    pub source_id_key: Option<String>,

    /// Analyzer for fields declared without one
    #[arg(long, default_value = "keyword")]
    pub analyzer: String,

    /// Count null and empty values as indexable content
    #[arg(long)]
    pub index_nulls: bool,

    /// Convert documents on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for encoding a value
#[derive(Parser, Debug, Clone)]
pub struct EncodeArgs {
    /// How to interpret the value
    #[arg(short, long)]
    pub kind: EncodeKind,

    /// The value to encode
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub value: String,

    /// Analyzer applied to text values
    #[arg(long, default_value = "keyword")]
    pub analyzer: String,
}

/// Value kinds accepted by the encode command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeKind {
    /// Signed 64-bit integer
    Int,
    /// 64-bit floating point number
    Double,
    /// true or false
    Bool,
    /// UTF-8 text, analyzed
    Text,
    /// RFC 3339 date/time, naive date/time or date
    Datetime,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
