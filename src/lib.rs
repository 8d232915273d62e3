//! # Termsmith
//!
//! Order-preserving conversion of dynamically shaped documents into index
//! terms.
//!
//! ## Features
//!
//! - Total classification of runtime field values
//! - Byte-lexicographic encodings that preserve numeric and date order
//! - Compound terms over two fields with a trailing length byte
//! - Per-field analysis of string values
//! - Scratch buffers with power-of-two growth and a release threshold
//! - Optional JSON snapshots of the indexed values
//! - Parallel batch conversion with one converter per worker

pub mod analysis;
pub mod cli;
pub mod converter;
pub mod document;
pub mod error;
pub mod index;
pub mod schema;
pub mod term;
pub mod util;

pub mod prelude {
    pub use crate::analysis::{
        Analyzer, KeywordAnalyzer, LowercaseAnalyzer, PerFieldAnalyzer, TermAnalyzer,
    };
    pub use crate::converter::{
        AccessorBinding, ConversionOutcome, ConverterConfig, DocumentConverter, IndexItem,
        convert_batch,
    };
    pub use crate::document::{Document, DocumentBuilder, MapOutput, Value};
    pub use crate::error::{Result, TermsmithError};
    pub use crate::index::{IndexEntry, IndexEntryBuilder, MemoryEntryBuilder};
    pub use crate::schema::{CompoundFieldSpec, FieldCatalog, FieldId, IndexField};
    pub use crate::term::{TermEncoder, TermValue, ValueKind, split_compound_term};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
