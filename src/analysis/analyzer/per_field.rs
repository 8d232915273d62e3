//! Per-field analyzer.

use std::sync::Arc;

use ahash::AHashMap;

use crate::analysis::analyzer::analyzer::{Analyzer, TermAnalyzer};
use crate::error::Result;
use crate::schema::catalog::FieldCatalog;
use crate::schema::field::FieldId;

/// A per-field analyzer that applies different analyzers to different fields.
///
/// Fields are keyed by their [`FieldId`], with a default analyzer for fields
/// not explicitly configured.
///
/// # Memory Efficiency
///
/// When using the same analyzer for multiple fields, reuse a single instance
/// with `Arc::clone`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use termsmith::analysis::{Analyzer, KeywordAnalyzer, LowercaseAnalyzer, PerFieldAnalyzer};
/// use termsmith::schema::FieldId;
///
/// let keyword: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
/// let mut analyzer = PerFieldAnalyzer::new(Arc::new(LowercaseAnalyzer::new()));
/// analyzer.add_analyzer(FieldId(1), Arc::clone(&keyword));
/// analyzer.add_analyzer(FieldId(2), Arc::clone(&keyword));
/// // every other field is lowercased
/// assert_eq!(analyzer.get_analyzer(FieldId(3)).name(), "lowercase");
/// ```
#[derive(Clone)]
pub struct PerFieldAnalyzer {
    /// Default analyzer for fields not in the map.
    default_analyzer: Arc<dyn Analyzer>,

    /// Map of field ids to their specific analyzers.
    field_analyzers: AHashMap<FieldId, Arc<dyn Analyzer>>,
}

impl PerFieldAnalyzer {
    /// Create a new per-field analyzer with a default analyzer.
    pub fn new(default_analyzer: Arc<dyn Analyzer>) -> Self {
        Self {
            default_analyzer,
            field_analyzers: AHashMap::new(),
        }
    }

    /// Build a per-field analyzer from the analyzers declared in a catalog.
    ///
    /// Fields declared without an analyzer use `default_analyzer`.
    pub fn from_catalog(catalog: &FieldCatalog, default_analyzer: Arc<dyn Analyzer>) -> Self {
        let mut analyzer = Self::new(default_analyzer);
        for field in catalog.fields() {
            if let Some(field_analyzer) = &field.analyzer {
                analyzer.add_analyzer(field.id, Arc::clone(field_analyzer));
            }
        }
        analyzer
    }

    /// Add a field-specific analyzer.
    pub fn add_analyzer(&mut self, field: FieldId, analyzer: Arc<dyn Analyzer>) {
        self.field_analyzers.insert(field, analyzer);
    }

    /// Get the analyzer for a specific field.
    pub fn get_analyzer(&self, field: FieldId) -> &Arc<dyn Analyzer> {
        self.field_analyzers
            .get(&field)
            .unwrap_or(&self.default_analyzer)
    }

    /// Get the default analyzer.
    pub fn default_analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.default_analyzer
    }
}

impl TermAnalyzer for PerFieldAnalyzer {
    fn analyze(&self, field_id: FieldId, term: &[u8], output: &mut Vec<u8>) -> Result<()> {
        self.get_analyzer(field_id).analyze_term(term, output)
    }
}

impl std::fmt::Debug for PerFieldAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self
            .field_analyzers
            .iter()
            .map(|(id, analyzer)| (*id, analyzer.name()))
            .collect();
        fields.sort();
        f.debug_struct("PerFieldAnalyzer")
            .field("default_analyzer", &self.default_analyzer.name())
            .field("field_analyzers", &fields)
            .finish()
    }
}
