//! The field catalog: the set of fields an index accepts.
//!
//! A catalog is built once per index and shared read-only by every converter
//! of that index. Field ids are assigned by the catalog:
//!
//! | id            | field                                     |
//! |---------------|-------------------------------------------|
//! | `0`           | document id (`id()`)                      |
//! | `1..=n`       | declared fields, in declaration order     |
//! | `n + 1`       | source document id (`sourceDocId()`), optional |
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use termsmith::analysis::LowercaseAnalyzer;
//! use termsmith::schema::{FieldCatalog, FieldId, ReservedField};
//!
//! let catalog = FieldCatalog::builder()
//!     .field("Company")
//!     .analyzed_field("Name", Arc::new(LowercaseAnalyzer::new()))
//!     .with_source_document_id()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(catalog.lookup("Name").unwrap().id, FieldId(2));
//! assert_eq!(
//!     catalog.lookup_reserved(ReservedField::SourceDocumentId).unwrap().id,
//!     FieldId(3)
//! );
//! assert_eq!(catalog.last_field_id(), FieldId(3));
//! ```

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, analyzer_by_name};
use crate::error::{Result, TermsmithError};
use crate::schema::field::{FieldId, IndexField};

/// Name of the reserved document-id field.
pub const DOCUMENT_ID_FIELD: &str = "id()";

/// Name of the reserved source-document-id field of multi-source indexes.
pub const SOURCE_DOCUMENT_ID_FIELD: &str = "sourceDocId()";

/// Fields the catalog defines on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedField {
    DocumentId,
    SourceDocumentId,
}

/// The fields of one index.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<IndexField>,
    by_name: AHashMap<String, usize>,
    document_id: IndexField,
    source_document_id: Option<IndexField>,
}

impl FieldCatalog {
    /// Start building a catalog.
    pub fn builder() -> FieldCatalogBuilder {
        FieldCatalogBuilder::default()
    }

    /// Resolve a declared field by name.
    pub fn lookup(&self, name: &str) -> Option<&IndexField> {
        self.by_name.get(name).map(|&index| &self.fields[index])
    }

    /// Resolve one of the reserved fields.
    pub fn lookup_reserved(&self, field: ReservedField) -> Option<&IndexField> {
        match field {
            ReservedField::DocumentId => Some(&self.document_id),
            ReservedField::SourceDocumentId => self.source_document_id.as_ref(),
        }
    }

    /// The declared fields, in id order.
    pub fn fields(&self) -> &[IndexField] {
        &self.fields
    }

    /// Names of the declared fields, in id order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the catalog declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The highest id handed out by the catalog. Synthetic fields (compound
    /// terms) are numbered after it.
    pub fn last_field_id(&self) -> FieldId {
        match &self.source_document_id {
            Some(field) => field.id,
            None => self.fields.last().map_or(FieldId::DOCUMENT_ID, |f| f.id),
        }
    }

    /// Build a catalog from its serialized definition.
    pub fn from_definition(definition: &FieldCatalogDefinition) -> Result<Self> {
        let mut builder = FieldCatalog::builder();
        for field in &definition.fields {
            builder = match &field.analyzer {
                Some(name) => builder.analyzed_field(&field.name, analyzer_by_name(name)?),
                None => builder.field(&field.name),
            };
        }
        if definition.source_document_id {
            builder = builder.with_source_document_id();
        }
        builder.build()
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: FieldCatalogDefinition = serde_json::from_str(json)?;
        Self::from_definition(&definition)
    }
}

/// Builder for [`FieldCatalog`].
#[derive(Default)]
pub struct FieldCatalogBuilder {
    fields: Vec<(String, Option<Arc<dyn Analyzer>>)>,
    source_document_id: bool,
}

impl FieldCatalogBuilder {
    /// Declare a field that uses the index default analyzer.
    pub fn field<S: Into<String>>(mut self, name: S) -> Self {
        self.fields.push((name.into(), None));
        self
    }

    /// Declare a field with its own analyzer.
    pub fn analyzed_field<S: Into<String>>(mut self, name: S, analyzer: Arc<dyn Analyzer>) -> Self {
        self.fields.push((name.into(), Some(analyzer)));
        self
    }

    /// Add the source-document-id field used by multi-source indexes.
    pub fn with_source_document_id(mut self) -> Self {
        self.source_document_id = true;
        self
    }

    /// Assign ids and build the catalog.
    pub fn build(self) -> Result<FieldCatalog> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut by_name = AHashMap::with_capacity(self.fields.len());

        for (index, (name, analyzer)) in self.fields.into_iter().enumerate() {
            if name.is_empty() {
                return Err(TermsmithError::invalid_config("Field name cannot be empty"));
            }
            if name == DOCUMENT_ID_FIELD || name == SOURCE_DOCUMENT_ID_FIELD {
                return Err(TermsmithError::invalid_config(format!(
                    "Field name '{name}' is reserved"
                )));
            }
            if by_name.contains_key(&name) {
                return Err(TermsmithError::invalid_config(format!(
                    "Field '{name}' already exists"
                )));
            }

            let mut field = IndexField::new(FieldId(index as u32 + 1), name.clone());
            field.analyzer = analyzer;
            by_name.insert(name, index);
            fields.push(field);
        }

        let source_document_id = self
            .source_document_id
            .then(|| IndexField::new(FieldId(fields.len() as u32 + 1), SOURCE_DOCUMENT_ID_FIELD));

        Ok(FieldCatalog {
            fields,
            by_name,
            document_id: IndexField::new(FieldId::DOCUMENT_ID, DOCUMENT_ID_FIELD),
            source_document_id,
        })
    }
}

/// Serialized form of a catalog.
///
/// ```json
/// {
///   "fields": [{"name": "Company"}, {"name": "Name", "analyzer": "lowercase"}],
///   "source_document_id": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalogDefinition {
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub source_document_id: bool,
}

/// Serialized form of one declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::LowercaseAnalyzer;

    #[test]
    fn test_ids_follow_declaration_order() {
        let catalog = FieldCatalog::builder()
            .field("Company")
            .field("Employee")
            .field("Freight")
            .build()
            .unwrap();

        assert_eq!(catalog.lookup("Company").unwrap().id, FieldId(1));
        assert_eq!(catalog.lookup("Employee").unwrap().id, FieldId(2));
        assert_eq!(catalog.lookup("Freight").unwrap().id, FieldId(3));
        assert_eq!(catalog.last_field_id(), FieldId(3));
        assert_eq!(catalog.field_names(), vec!["Company", "Employee", "Freight"]);
        assert!(catalog.lookup("Missing").is_none());
    }

    #[test]
    fn test_reserved_fields() {
        let catalog = FieldCatalog::builder().field("Company").build().unwrap();
        let id = catalog.lookup_reserved(ReservedField::DocumentId).unwrap();
        assert_eq!(id.id, FieldId::DOCUMENT_ID);
        assert_eq!(id.name, DOCUMENT_ID_FIELD);
        assert!(
            catalog
                .lookup_reserved(ReservedField::SourceDocumentId)
                .is_none()
        );
        assert!(catalog.lookup(DOCUMENT_ID_FIELD).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = FieldCatalog::builder().build().unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.last_field_id(), FieldId::DOCUMENT_ID);
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        let duplicate = FieldCatalog::builder().field("A").field("A").build();
        assert!(matches!(duplicate, Err(TermsmithError::InvalidConfig(_))));

        let reserved = FieldCatalog::builder().field(DOCUMENT_ID_FIELD).build();
        assert!(matches!(reserved, Err(TermsmithError::InvalidConfig(_))));

        let empty = FieldCatalog::builder().field("").build();
        assert!(matches!(empty, Err(TermsmithError::InvalidConfig(_))));
    }

    #[test]
    fn test_analyzed_field() {
        let catalog = FieldCatalog::builder()
            .analyzed_field("Name", Arc::new(LowercaseAnalyzer::new()))
            .build()
            .unwrap();
        let field = catalog.lookup("Name").unwrap();
        assert_eq!(field.analyzer.as_ref().unwrap().name(), "lowercase");
    }

    #[test]
    fn test_from_json() {
        let catalog = FieldCatalog::from_json_str(
            r#"{
                "fields": [{"name": "Company"}, {"name": "Name", "analyzer": "lowercase"}],
                "source_document_id": true
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup("Company").unwrap().analyzer.is_none());
        assert!(catalog.lookup("Name").unwrap().analyzer.is_some());
        assert_eq!(catalog.last_field_id(), FieldId(3));
    }

    #[test]
    fn test_from_json_unknown_analyzer() {
        let result =
            FieldCatalog::from_json_str(r#"{"fields": [{"name": "A", "analyzer": "snowball"}]}"#);
        assert!(matches!(result, Err(TermsmithError::InvalidConfig(_))));
    }
}
