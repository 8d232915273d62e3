//! Lowercase analyzer.
//!
//! Applies Unicode lowercasing to the whole term. The result can be longer
//! than the input: `'İ'` (2 bytes) lowercases to `"i̇"` (3 bytes).
//!
//! # Examples
//!
//! ```
//! use termsmith::analysis::analyzer::analyzer::Analyzer;
//! use termsmith::analysis::analyzer::lowercase::LowercaseAnalyzer;
//!
//! let analyzer = LowercaseAnalyzer::new();
//! let mut output = Vec::new();
//! analyzer.analyze_term("Companies/5".as_bytes(), &mut output).unwrap();
//!
//! assert_eq!(output, b"companies/5");
//! ```

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::error::{Result, TermsmithError};

/// An analyzer that lowercases the term.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseAnalyzer;

impl LowercaseAnalyzer {
    /// Create a new lowercase analyzer.
    pub fn new() -> Self {
        LowercaseAnalyzer
    }
}

impl Analyzer for LowercaseAnalyzer {
    fn analyze_term(&self, term: &[u8], output: &mut Vec<u8>) -> Result<()> {
        let text = std::str::from_utf8(term)
            .map_err(|e| TermsmithError::analysis(format!("term is not valid UTF-8: {e}")))?;

        // ASCII fast path
        if text.is_ascii() {
            output.extend(term.iter().map(u8::to_ascii_lowercase));
            return Ok(());
        }

        let mut utf8 = [0u8; 4];
        for c in text.chars().flat_map(char::to_lowercase) {
            output.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
