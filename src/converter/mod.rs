//! Document conversion.
//!
//! This module turns map output documents into index entries: the
//! [`DocumentConverter`] itself, its configuration, stored snapshots and
//! parallel batch conversion.

pub mod config;
#[allow(clippy::module_inception)]
pub mod converter;
pub mod parallel;
pub mod snapshot;

// Re-export commonly used types
pub use config::{AccessorBinding, ConverterConfig, DEFAULT_MAX_TERM_LENGTH};
pub use converter::{ConversionOutcome, DocumentConverter};
pub use parallel::{IndexItem, convert_batch, convert_item};
pub use snapshot::to_stored_json;
