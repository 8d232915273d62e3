//! Configuration for document converters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TermsmithError};
use crate::schema::compound::CompoundFieldSpec;
use crate::term::scratch::DEFAULT_RELEASE_THRESHOLD;

/// Default cap on the size of a single term.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 1024;

/// How a converter resolves the fields of the documents it receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorBinding {
    /// Bind to the shape of the first document and reuse it. Every document
    /// handed to the converter must have that shape.
    #[default]
    ShapeBound,
    /// Resolve fields per document, for indexes fed by several document
    /// shapes.
    Dynamic,
}

/// Configuration for a [`DocumentConverter`](super::DocumentConverter).
///
/// # Example
///
/// ```
/// use termsmith::converter::{AccessorBinding, ConverterConfig};
///
/// let config = ConverterConfig::from_json_str(
///     r#"{"store_values": true, "accessor": "dynamic", "compound_fields": [["Year", "Month"]]}"#,
/// )
/// .unwrap();
///
/// assert!(config.store_values);
/// assert_eq!(config.accessor, AccessorBinding::Dynamic);
/// assert_eq!(config.max_term_length, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Capture a JSON snapshot of the indexed values with every entry.
    pub store_values: bool,

    /// Commit entries of documents that produced no indexable content.
    pub index_empty_entries: bool,

    /// Field resolution strategy.
    pub accessor: AccessorBinding,

    /// Largest compound term, in bytes.
    pub max_term_length: usize,

    /// Scratch buffers larger than this are released after each document.
    pub scratch_release_threshold: usize,

    /// Compound fields, numbered after the last catalog field in this order.
    pub compound_fields: Vec<CompoundFieldSpec>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            store_values: false,
            index_empty_entries: false,
            accessor: AccessorBinding::ShapeBound,
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
            scratch_release_threshold: DEFAULT_RELEASE_THRESHOLD,
            compound_fields: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a configuration from JSON text. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ConverterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the limits and the arity of every compound field.
    pub fn validate(&self) -> Result<()> {
        if self.max_term_length == 0 {
            return Err(TermsmithError::invalid_config(
                "max_term_length must be greater than zero",
            ));
        }
        if self.scratch_release_threshold == 0 {
            return Err(TermsmithError::invalid_config(
                "scratch_release_threshold must be greater than zero",
            ));
        }
        for spec in &self.compound_fields {
            spec.check_arity()?;
        }
        Ok(())
    }
}
