//! Term analyzers.

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod keyword;
pub mod lowercase;
pub mod per_field;

use std::sync::Arc;

use crate::error::{Result, TermsmithError};

pub use analyzer::{Analyzer, TermAnalyzer};
pub use keyword::KeywordAnalyzer;
pub use lowercase::LowercaseAnalyzer;
pub use per_field::PerFieldAnalyzer;

/// Resolve a built-in analyzer by its configuration name.
pub fn analyzer_by_name(name: &str) -> Result<Arc<dyn Analyzer>> {
    match name {
        "keyword" => Ok(Arc::new(KeywordAnalyzer::new())),
        "lowercase" => Ok(Arc::new(LowercaseAnalyzer::new())),
        other => Err(TermsmithError::invalid_config(format!(
            "unknown analyzer '{other}', expected one of: keyword, lowercase"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_by_name() {
        assert_eq!(analyzer_by_name("keyword").unwrap().name(), "keyword");
        assert_eq!(analyzer_by_name("lowercase").unwrap().name(), "lowercase");
        assert!(matches!(
            analyzer_by_name("standard"),
            Err(TermsmithError::InvalidConfig(_))
        ));
    }
}
