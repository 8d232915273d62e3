//! Index field definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;

/// Numeric identity of an index field.
///
/// Id `0` is the document-id field. Declared fields are numbered from `1` in
/// declaration order, followed by the optional source-document-id field and
/// then the synthetic compound fields.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The id of the document-id field.
    pub const DOCUMENT_ID: FieldId = FieldId(0);

    /// The raw id value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// The id `offset` positions after this one.
    pub fn offset(self, offset: u32) -> FieldId {
        FieldId(self.0 + offset)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(id: u32) -> Self {
        FieldId(id)
    }
}

/// A field the index knows about.
#[derive(Clone)]
pub struct IndexField {
    /// Field identity.
    pub id: FieldId,
    /// Field name as it appears in documents.
    pub name: String,
    /// Analyzer for string values of this field, if it differs from the
    /// index default.
    pub analyzer: Option<Arc<dyn Analyzer>>,
}

impl IndexField {
    /// Create a field without a dedicated analyzer.
    pub fn new<S: Into<String>>(id: FieldId, name: S) -> Self {
        IndexField {
            id,
            name: name.into(),
            analyzer: None,
        }
    }

    /// Attach an analyzer to this field.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }
}

// Manual Debug implementation to handle Arc<dyn Analyzer>
impl fmt::Debug for IndexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexField")
            .field("id", &self.id)
            .field("name", &self.name)
            .field(
                "analyzer",
                &self.analyzer.as_ref().map(|a| format!("<{}>", a.name())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::LowercaseAnalyzer;

    #[test]
    fn test_field_id() {
        assert_eq!(FieldId::DOCUMENT_ID, FieldId(0));
        assert_eq!(FieldId(3).offset(2), FieldId(5));
        assert_eq!(FieldId(7).to_string(), "#7");
        assert!(FieldId(1) < FieldId(2));
    }

    #[test]
    fn test_field_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&FieldId(4)).unwrap(), "4");
        let id: FieldId = serde_json::from_str("9").unwrap();
        assert_eq!(id, FieldId(9));
    }

    #[test]
    fn test_index_field_debug() {
        let field =
            IndexField::new(FieldId(1), "Name").with_analyzer(Arc::new(LowercaseAnalyzer::new()));
        let debug = format!("{field:?}");
        assert!(debug.contains("Name"));
        assert!(debug.contains("<lowercase>"));
    }
}
