//! Keyword analyzer that keeps the term exactly as provided.
//!
//! # Use Cases
//!
//! - ID fields (document references, product codes, etc.)
//! - Numeric-looking strings that must not be normalized
//! - Any field where you want exact byte matching
//!
//! # Examples
//!
//! ```
//! use termsmith::analysis::analyzer::analyzer::Analyzer;
//! use termsmith::analysis::analyzer::keyword::KeywordAnalyzer;
//!
//! let analyzer = KeywordAnalyzer::new();
//! let mut output = Vec::new();
//! analyzer.analyze_term(b"Companies/5", &mut output).unwrap();
//!
//! assert_eq!(output, b"Companies/5");
//! ```

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::error::Result;

/// An analyzer that copies the term unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// Create a new keyword analyzer.
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze_term(&self, term: &[u8], output: &mut Vec<u8>) -> Result<()> {
        output.extend_from_slice(term);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "keyword"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_analyzer() {
        let analyzer = KeywordAnalyzer::new();
        let mut output = Vec::new();
        analyzer.analyze_term(b"Hello World Test", &mut output).unwrap();

        assert_eq!(output, b"Hello World Test");
    }

    #[test]
    fn test_keyword_analyzer_keeps_invalid_utf8() {
        let analyzer = KeywordAnalyzer::new();
        let mut output = Vec::new();
        analyzer.analyze_term(&[0xFF, 0x00], &mut output).unwrap();

        assert_eq!(output, vec![0xFF, 0x00]);
    }
}
