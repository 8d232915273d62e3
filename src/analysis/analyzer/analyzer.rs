//! Core analyzer trait definitions.
//!
//! This module defines the [`Analyzer`] trait, which turns the raw UTF-8
//! bytes of one term into its final indexable bytes, and the
//! [`TermAnalyzer`] contract the encoder consumes, which routes a term to the
//! analyzer of its owning field.
//!
//! # Role in the conversion pipeline
//!
//! ```text
//! string value → UTF-8 bytes → TermAnalyzer(field id) → Analyzer → term bytes
//! ```
//!
//! The output of an analyzer may be longer than its input (lowercasing some
//! characters grows their UTF-8 encoding). Analyzers must be deterministic:
//! compound terms are only ordered correctly when identical input always
//! produces identical output.
//!
//! # Available Implementations
//!
//! - [`KeywordAnalyzer`](super::keyword::KeywordAnalyzer) - Identity, exact match
//! - [`LowercaseAnalyzer`](super::lowercase::LowercaseAnalyzer) - Unicode lowercasing
//! - [`PerFieldAnalyzer`](super::per_field::PerFieldAnalyzer) - Different analyzers per field id
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use termsmith::analysis::analyzer::analyzer::Analyzer;
//! use termsmith::error::Result;
//!
//! struct ReverseAnalyzer;
//!
//! impl Analyzer for ReverseAnalyzer {
//!     fn analyze_term(&self, term: &[u8], output: &mut Vec<u8>) -> Result<()> {
//!         output.extend(term.iter().rev());
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "reverse"
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! let mut output = Vec::new();
//! ReverseAnalyzer.analyze_term(b"abc", &mut output).unwrap();
//! assert_eq!(output, b"cba");
//! ```

use crate::error::Result;
use crate::schema::field::FieldId;

/// Trait for analyzers that normalize a single term.
///
/// # Thread Safety
///
/// The trait requires `Send + Sync` so one analyzer instance can be shared by
/// the converters of every indexing worker.
pub trait Analyzer: Send + Sync {
    /// Analyze `term` and append the result to `output`.
    ///
    /// Callers clear `output` before the call; implementations only append.
    fn analyze_term(&self, term: &[u8], output: &mut Vec<u8>) -> Result<()>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// The analyzer contract consumed by the term encoder: analysis keyed by the
/// id of the field that owns the term.
pub trait TermAnalyzer: Send + Sync {
    /// Analyze `term` for `field_id` and append the result to `output`.
    fn analyze(&self, field_id: FieldId, term: &[u8], output: &mut Vec<u8>) -> Result<()>;
}
