//! Error types for the Termsmith library.
//!
//! This module provides error handling for all conversion operations.
//! All errors are represented by the [`TermsmithError`] enum. Every fatal
//! condition carries enough context (field name, value kind, concrete size)
//! to diagnose the failing document without re-running the conversion.
//!
//! Skipping a document that produced no indexable content is *not* an error;
//! it is reported as [`ConversionOutcome::Skipped`](crate::converter::ConversionOutcome::Skipped).
//!
//! # Examples
//!
//! ```
//! use termsmith::error::{TermsmithError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TermsmithError::invalid_config("max_term_length must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Termsmith operations.
#[derive(Error, Debug)]
pub enum TermsmithError {
    /// A document exposes a field that the field catalog does not define.
    #[error("Field '{field}' is not defined. Available fields: {}.", .known_fields.join(", "))]
    UndefinedField {
        field: String,
        known_fields: Vec<String>,
    },

    /// The document has no resolvable identifier.
    #[error("Cannot find any identifier of the document.")]
    MissingIdentifier,

    /// A value's runtime type cannot be classified or coerced.
    #[error("Unsupported value of type '{type_name}' for field '{field}': {reason}")]
    UnsupportedValueType {
        field: String,
        type_name: String,
        reason: String,
    },

    /// A single compound component encoded to more than 255 bytes.
    #[error(
        "Unable to create compound term {compound}: value of kind {kind} for field '{field}' \
         exceeded the {max} byte limit of a compound component (was {size})",
        max = u8::MAX
    )]
    ComponentTooLarge {
        compound: String,
        field: String,
        kind: String,
        size: usize,
    },

    /// The assembled compound term is larger than the configured term cap.
    #[error(
        "Compound term {compound} cannot exceed {max} bytes, but was {size} \
         (first component: {first}, second component: {second})"
    )]
    CompoundTermTooLarge {
        compound: String,
        first: String,
        second: String,
        size: usize,
        max: usize,
    },

    /// A compound field was declared with a field count other than two.
    #[error("Compound fields support exactly 2 fields, got {}: [{}]", .fields.len(), .fields.join(", "))]
    UnsupportedCompoundArity { fields: Vec<String> },

    /// A byte string is not a valid compound term.
    #[error("Invalid compound term: {0}")]
    InvalidCompoundTerm(String),

    /// Analysis-related errors
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Decompression of a compressed string value failed
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// I/O errors (configuration and document files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with TermsmithError.
pub type Result<T> = std::result::Result<T, TermsmithError>;

impl TermsmithError {
    /// Create a new undefined field error.
    pub fn undefined_field<S: Into<String>>(field: S, known_fields: Vec<String>) -> Self {
        TermsmithError::UndefinedField {
            field: field.into(),
            known_fields,
        }
    }

    /// Create a new unsupported value error.
    pub fn unsupported_value<F, T, R>(field: F, type_name: T, reason: R) -> Self
    where
        F: Into<String>,
        T: Into<String>,
        R: Into<String>,
    {
        TermsmithError::UnsupportedValueType {
            field: field.into(),
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TermsmithError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        TermsmithError::InvalidConfig(msg.into())
    }

    /// Create a new decompression error.
    pub fn decompression<S: Into<String>>(msg: S) -> Self {
        TermsmithError::Decompression(msg.into())
    }

    /// Create a new invalid compound term error.
    pub fn invalid_compound_term<S: Into<String>>(msg: S) -> Self {
        TermsmithError::InvalidCompoundTerm(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        TermsmithError::Other(msg.into())
    }

    /// Whether the error is a per-document data problem rather than a
    /// configuration problem of the index itself.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            TermsmithError::MissingIdentifier
                | TermsmithError::UnsupportedValueType { .. }
                | TermsmithError::ComponentTooLarge { .. }
                | TermsmithError::CompoundTermTooLarge { .. }
                | TermsmithError::Decompression(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_field_message_lists_known_fields() {
        let error = TermsmithError::undefined_field(
            "Compny",
            vec!["Company".to_string(), "Employee".to_string()],
        );
        assert_eq!(
            error.to_string(),
            "Field 'Compny' is not defined. Available fields: Company, Employee."
        );
        assert!(!error.is_document_error());
    }

    #[test]
    fn test_component_too_large_message() {
        let error = TermsmithError::ComponentTooLarge {
            compound: "[Name, Age]".to_string(),
            field: "Name".to_string(),
            kind: "String".to_string(),
            size: 300,
        };
        let message = error.to_string();
        assert!(message.contains("255"));
        assert!(message.contains("was 300"));
        assert!(error.is_document_error());
    }

    #[test]
    fn test_arity_message() {
        let error = TermsmithError::UnsupportedCompoundArity {
            fields: vec!["A".to_string(), "B".to_string(), "C".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Compound fields support exactly 2 fields, got 3: [A, B, C]"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = TermsmithError::from(io_error);

        match error {
            TermsmithError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
