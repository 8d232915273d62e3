//! Document to index entry conversion.
//!
//! A [`DocumentConverter`] is created once per index (or per indexing
//! worker) and reused for every document. Each call to
//! [`DocumentConverter::convert`] runs the same sequence:
//!
//! ```text
//! boost → regular fields → skip check → stored snapshot
//!       → compound fields → source document id → document id → commit
//! ```
//!
//! A converter owns its scratch buffers and its shape-bound accessor, so it
//! must not be shared between threads; give every worker its own instance
//! (see [`DocumentConverter::fresh_copy`]).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use termsmith::analysis::{KeywordAnalyzer, PerFieldAnalyzer};
//! use termsmith::converter::{ConversionOutcome, ConverterConfig, DocumentConverter};
//! use termsmith::document::{Document, MapOutput};
//! use termsmith::index::MemoryEntryBuilder;
//! use termsmith::schema::{FieldCatalog, FieldId};
//!
//! let catalog = Arc::new(FieldCatalog::builder().field("Company").build().unwrap());
//! let analyzer = Arc::new(PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new())));
//! let mut converter =
//!     DocumentConverter::new(catalog, analyzer, ConverterConfig::default()).unwrap();
//!
//! let document = Document::builder().add_text("Company", "companies/5").build();
//! let mut builder = MemoryEntryBuilder::new();
//! let outcome = converter
//!     .convert(Some("orders/5"), None, &MapOutput::from(document), &mut builder)
//!     .unwrap();
//!
//! assert_eq!(outcome, ConversionOutcome::Committed);
//! let entry = &builder.entries()[0];
//! assert_eq!(entry.term(FieldId(1)), Some(&b"companies/5"[..]));
//! assert_eq!(entry.term(FieldId(0)), Some(&b"orders/5"[..]));
//! ```

use std::sync::Arc;

use log::{debug, warn};
use serde_json::{Map, Value as JsonValue};

use crate::analysis::analyzer::TermAnalyzer;
use crate::converter::config::{AccessorBinding, ConverterConfig};
use crate::converter::snapshot::to_stored_json;
use crate::document::accessor::{
    BoundAccessor, DynamicAccessor, PropertyAccessor, ShapeBoundAccessor,
};
use crate::document::document::{Document, MapOutput};
use crate::document::value::Value;
use crate::error::{Result, TermsmithError};
use crate::index::builder::IndexEntryBuilder;
use crate::schema::catalog::{
    DOCUMENT_ID_FIELD, FieldCatalog, ReservedField, SOURCE_DOCUMENT_ID_FIELD,
};
use crate::schema::compound::CompoundFieldSpec;
use crate::schema::field::{FieldId, IndexField};
use crate::term::compound::CompoundKeyBuilder;
use crate::term::encoder::{TermEncoder, TermValue};
use crate::term::scratch::{DEFAULT_INITIAL_CAPACITY, ScratchBuffer};

static NULL_VALUE: Value = Value::Null;

/// Result of a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// An entry was committed to the builder.
    Committed,
    /// The document produced no indexable content and was discarded.
    Skipped,
}

impl ConversionOutcome {
    pub fn is_committed(self) -> bool {
        self == ConversionOutcome::Committed
    }
}

/// A compound field with its components resolved against the catalog.
#[derive(Debug, Clone)]
struct ResolvedCompound {
    spec: CompoundFieldSpec,
    first: IndexField,
    second: IndexField,
    field_id: FieldId,
}

/// Converts documents into index entries.
pub struct DocumentConverter {
    catalog: Arc<FieldCatalog>,
    config: ConverterConfig,
    encoder: TermEncoder,
    field_buffer: ScratchBuffer,
    compound_builder: CompoundKeyBuilder,
    compounds: Vec<ResolvedCompound>,
    shape_accessor: Option<Arc<ShapeBoundAccessor>>,
}

impl DocumentConverter {
    /// Create a converter for the fields of `catalog`.
    ///
    /// Compound fields must name exactly two catalog fields. They receive
    /// the ids following [`FieldCatalog::last_field_id`], in declaration
    /// order.
    pub fn new(
        catalog: Arc<FieldCatalog>,
        analyzer: Arc<dyn TermAnalyzer>,
        config: ConverterConfig,
    ) -> Result<Self> {
        config.validate()?;

        let last_field_id = catalog.last_field_id();
        let mut compounds = Vec::with_capacity(config.compound_fields.len());
        for (index, spec) in config.compound_fields.iter().enumerate() {
            spec.validate(&catalog)?;
            let resolve = |name: &str| {
                catalog
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| TermsmithError::undefined_field(name, catalog.field_names()))
            };
            compounds.push(ResolvedCompound {
                spec: spec.clone(),
                first: resolve(spec.first())?,
                second: resolve(spec.second())?,
                field_id: last_field_id.offset(1 + index as u32),
            });
        }

        Ok(DocumentConverter {
            encoder: TermEncoder::new(analyzer),
            field_buffer: ScratchBuffer::with_limits(
                DEFAULT_INITIAL_CAPACITY,
                config.scratch_release_threshold,
            ),
            compound_builder: CompoundKeyBuilder::new(
                config.max_term_length,
                config.scratch_release_threshold,
            ),
            catalog,
            config,
            compounds,
            shape_accessor: None,
        })
    }

    /// A converter with the same catalog, analyzer and configuration but
    /// its own buffers and no bound shape.
    pub fn fresh_copy(&self) -> Self {
        DocumentConverter {
            catalog: Arc::clone(&self.catalog),
            config: self.config.clone(),
            encoder: TermEncoder::new(Arc::clone(self.encoder.analyzer())),
            field_buffer: ScratchBuffer::with_limits(
                DEFAULT_INITIAL_CAPACITY,
                self.config.scratch_release_threshold,
            ),
            compound_builder: CompoundKeyBuilder::new(
                self.config.max_term_length,
                self.config.scratch_release_threshold,
            ),
            compounds: self.compounds.clone(),
            shape_accessor: None,
        }
    }

    pub fn catalog(&self) -> &Arc<FieldCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Compound fields with the ids their terms are written under.
    pub fn compound_fields(&self) -> impl Iterator<Item = (&CompoundFieldSpec, FieldId)> + '_ {
        self.compounds.iter().map(|c| (&c.spec, c.field_id))
    }

    /// Allocated size of the regular field scratch buffer.
    pub fn field_buffer_capacity(&self) -> usize {
        self.field_buffer.capacity()
    }

    /// Allocated size of the compound term scratch buffer.
    pub fn compound_buffer_capacity(&self) -> usize {
        self.compound_builder.capacity()
    }

    /// Convert one map output into an entry of `builder`.
    ///
    /// `id` is the document identifier; `None` fails with
    /// [`TermsmithError::MissingIdentifier`] unless the document is skipped
    /// first. `source_document_id` is written only when the catalog has the
    /// source-document-id field.
    ///
    /// On error the builder may hold a partially written draft; discarding
    /// it is up to the caller.
    pub fn convert<B>(
        &mut self,
        id: Option<&str>,
        source_document_id: Option<&str>,
        output: &MapOutput,
        builder: &mut B,
    ) -> Result<ConversionOutcome>
    where
        B: IndexEntryBuilder + ?Sized,
    {
        let result = self.convert_document(id, source_document_id, output, builder);
        self.release_buffers();
        result
    }

    fn convert_document<B>(
        &mut self,
        id: Option<&str>,
        source_document_id: Option<&str>,
        output: &MapOutput,
        builder: &mut B,
    ) -> Result<ConversionOutcome>
    where
        B: IndexEntryBuilder + ?Sized,
    {
        if let Some(boost) = output.boost() {
            builder.boost(boost);
        }

        let document = output.document();
        let accessor = self.bind_accessor(document);
        accessor.check(document)?;
        let catalog = Arc::clone(&self.catalog);

        let mut has_content = false;
        let mut stored = self.config.store_values.then(Map::new);

        for (name, value) in accessor.properties(document) {
            let field = catalog
                .lookup(name)
                .ok_or_else(|| TermsmithError::undefined_field(name, catalog.field_names()))?;

            let wrote_content = self.write_field(field, value, builder)?;
            has_content |= wrote_content;

            // fields without content stay out of the snapshot
            if let Some(stored) = stored.as_mut().filter(|_| wrote_content) {
                match to_stored_json(value) {
                    Some(json) => {
                        stored.insert(name.to_string(), json);
                    }
                    None => warn!(
                        "value of type '{}' for field '{name}' has no JSON form, not stored",
                        value.type_name()
                    ),
                }
            }
        }

        if !has_content && !self.config.index_empty_entries {
            builder.discard();
            debug!(
                "skipped document {} without indexable content",
                id.unwrap_or("<no id>")
            );
            return Ok(ConversionOutcome::Skipped);
        }

        if let Some(stored) = stored {
            builder.store(&JsonValue::Object(stored))?;
        }

        for compound in &self.compounds {
            let first = accessor
                .get_value(document, compound.spec.first())
                .unwrap_or(&NULL_VALUE);
            let second = accessor
                .get_value(document, compound.spec.second())
                .unwrap_or(&NULL_VALUE);

            let term = self.compound_builder.assemble(
                &compound.spec,
                (&compound.first, first),
                (&compound.second, second),
                &mut self.encoder,
            )?;
            builder.write(compound.field_id, term, TermValue::Raw)?;
        }

        if let (Some(field), Some(source_id)) = (
            catalog.lookup_reserved(ReservedField::SourceDocumentId),
            source_document_id,
        ) {
            builder.write_raw(field.id, SOURCE_DOCUMENT_ID_FIELD, source_id.as_bytes())?;
        }

        let id = id
            .filter(|id| !id.is_empty())
            .ok_or(TermsmithError::MissingIdentifier)?;
        builder.write_raw(FieldId::DOCUMENT_ID, DOCUMENT_ID_FIELD, id.as_bytes())?;

        builder.commit()?;
        Ok(ConversionOutcome::Committed)
    }

    fn bind_accessor(&mut self, document: &Document) -> BoundAccessor {
        match self.config.accessor {
            AccessorBinding::Dynamic => BoundAccessor::Dynamic(DynamicAccessor),
            AccessorBinding::ShapeBound => {
                let accessor = self
                    .shape_accessor
                    .get_or_insert_with(|| Arc::new(ShapeBoundAccessor::from_document(document)));
                BoundAccessor::ShapeBound(Arc::clone(accessor))
            }
        }
    }

    /// Write the terms of one regular field. Arrays write one term per
    /// element.
    fn write_field<B>(&mut self, field: &IndexField, value: &Value, builder: &mut B) -> Result<bool>
    where
        B: IndexEntryBuilder + ?Sized,
    {
        match value {
            Value::Array(items) => {
                let mut has_content = false;
                for item in items {
                    has_content |= self.write_field(field, item, builder)?;
                }
                Ok(has_content)
            }
            Value::Object(_) => {
                let json = to_stored_json(value).ok_or_else(|| {
                    TermsmithError::unsupported_value(
                        &field.name,
                        value.type_name(),
                        "object has no JSON form",
                    )
                })?;
                let text = serde_json::to_string(&json)?;
                let encoded =
                    self.encoder
                        .encode_text(field, text.as_bytes(), &mut self.field_buffer, 0)?;
                builder.write(
                    field.id,
                    self.field_buffer.region(0, encoded.len),
                    encoded.value,
                )
            }
            _ => {
                let encoded = self
                    .encoder
                    .encode(field, value, &mut self.field_buffer, 0)?;
                builder.write(
                    field.id,
                    self.field_buffer.region(0, encoded.len),
                    encoded.value,
                )
            }
        }
    }

    fn release_buffers(&mut self) {
        let before = self.field_buffer.capacity();
        if self.field_buffer.release_if_oversized() {
            debug!("released field scratch buffer of {before} bytes");
        }
        self.compound_builder.release();
    }
}

impl std::fmt::Debug for DocumentConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentConverter")
            .field("fields", &self.catalog.len())
            .field("config", &self.config)
            .field("field_buffer_capacity", &self.field_buffer.capacity())
            .field("compound_buffer_capacity", &self.compound_builder.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, LowercaseAnalyzer, PerFieldAnalyzer};
    use crate::index::memory::MemoryEntryBuilder;
    use crate::term::encoder::decode_integer_term;

    fn catalog() -> Arc<FieldCatalog> {
        Arc::new(
            FieldCatalog::builder()
                .field("Company")
                .field("Year")
                .field("Month")
                .analyzed_field("Name", Arc::new(LowercaseAnalyzer::new()))
                .build()
                .unwrap(),
        )
    }

    fn converter(config: ConverterConfig) -> DocumentConverter {
        let catalog = catalog();
        let analyzer = PerFieldAnalyzer::from_catalog(&catalog, Arc::new(KeywordAnalyzer::new()));
        DocumentConverter::new(catalog, Arc::new(analyzer), config).unwrap()
    }

    fn compound_config() -> ConverterConfig {
        ConverterConfig {
            compound_fields: vec![CompoundFieldSpec::new("Year", "Month")],
            ..ConverterConfig::default()
        }
    }

    #[test]
    fn test_regular_fields_and_id() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder()
            .add_text("Company", "companies/5")
            .add_text("Name", "Hibernating Rhinos")
            .build();

        let outcome = converter
            .convert(Some("orders/5"), None, &document.into(), &mut builder)
            .unwrap();

        assert_eq!(outcome, ConversionOutcome::Committed);
        let entry = &builder.entries()[0];
        assert_eq!(entry.term(FieldId(1)), Some(&b"companies/5"[..]));
        assert_eq!(entry.term(FieldId(4)), Some(&b"hibernating rhinos"[..]));
        let last = entry.terms.last().unwrap();
        assert_eq!(last.field, FieldId::DOCUMENT_ID);
        assert_eq!(last.term, b"orders/5");
    }

    #[test]
    fn test_compound_field_id_follows_catalog() {
        let mut converter = converter(compound_config());
        let (_, compound_id) = converter.compound_fields().next().unwrap();
        assert_eq!(compound_id, FieldId(5));

        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder()
            .add_integer("Year", 2021)
            .add_integer("Month", 3)
            .build();
        converter
            .convert(Some("orders/1"), None, &document.into(), &mut builder)
            .unwrap();

        let term = builder.entries()[0].term(FieldId(5)).unwrap();
        assert_eq!(term.len(), 17);
        assert_eq!(term[16], 8);
        assert_eq!(decode_integer_term(&term[..8]), Some(2021));
    }

    #[test]
    fn test_missing_compound_component_is_null() {
        let mut converter = converter(compound_config());
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder().add_integer("Month", 3).build();
        converter
            .convert(Some("orders/1"), None, &document.into(), &mut builder)
            .unwrap();

        let term = builder.entries()[0].term(FieldId(5)).unwrap();
        assert_eq!(term.len(), 9);
        assert_eq!(term[8], 0);
    }

    #[test]
    fn test_undefined_field() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder().add_text("Compny", "x").build();

        let result = converter.convert(Some("orders/1"), None, &document.into(), &mut builder);
        match result {
            Err(TermsmithError::UndefinedField {
                field,
                known_fields,
            }) => {
                assert_eq!(field, "Compny");
                assert_eq!(known_fields, vec!["Company", "Year", "Month", "Name"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_skip_and_commit_empty() {
        let document = Document::builder().add_null("Company").build();

        let mut skipping = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let outcome = skipping
            .convert(Some("orders/1"), None, &document.clone().into(), &mut builder)
            .unwrap();
        assert_eq!(outcome, ConversionOutcome::Skipped);
        assert!(builder.entries().is_empty());
        assert_eq!(builder.discarded(), 1);

        let mut committing = converter(ConverterConfig {
            index_empty_entries: true,
            ..ConverterConfig::default()
        });
        let mut builder = MemoryEntryBuilder::new();
        let outcome = committing
            .convert(Some("orders/1"), None, &document.into(), &mut builder)
            .unwrap();
        assert_eq!(outcome, ConversionOutcome::Committed);
        let entry = &builder.entries()[0];
        assert_eq!(entry.terms.len(), 1);
        assert_eq!(entry.terms[0].field, FieldId::DOCUMENT_ID);
    }

    #[test]
    fn test_missing_identifier() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder().add_text("Company", "x").build();
        let result = converter.convert(None, None, &document.into(), &mut builder);
        assert!(matches!(result, Err(TermsmithError::MissingIdentifier)));
    }

    #[test]
    fn test_boost_and_store() {
        let mut converter = converter(ConverterConfig {
            store_values: true,
            ..ConverterConfig::default()
        });
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder()
            .add_text("Company", "companies/5")
            .add_integer("Year", 2021)
            .build();

        converter
            .convert(
                Some("orders/5"),
                None,
                &MapOutput::boosted(document, 2.5),
                &mut builder,
            )
            .unwrap();

        let entry = &builder.entries()[0];
        assert_eq!(entry.boost, 2.5);
        assert_eq!(
            entry.stored,
            Some(serde_json::json!({"Company": "companies/5", "Year": 2021}))
        );
    }

    #[test]
    fn test_fields_without_content_are_not_stored() {
        let mut converter = converter(ConverterConfig {
            store_values: true,
            ..ConverterConfig::default()
        });
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder()
            .add_text("Company", "companies/5")
            .add_null("Year")
            .add_text("Month", "")
            .build();

        converter
            .convert(Some("orders/5"), None, &document.into(), &mut builder)
            .unwrap();

        let stored = builder.entries()[0].stored.as_ref().unwrap();
        assert_eq!(stored, &serde_json::json!({"Company": "companies/5"}));
        assert!(stored.get("Year").is_none());
    }

    #[test]
    fn test_shape_bound_converter_rejects_other_shapes() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let first = Document::builder()
            .add_text("Company", "companies/5")
            .add_integer("Year", 2021)
            .build();
        let other = Document::builder().add_text("Company", "companies/6").build();

        converter
            .convert(Some("orders/5"), None, &first.into(), &mut builder)
            .unwrap();
        let result = converter.convert(Some("orders/6"), None, &other.into(), &mut builder);

        assert!(matches!(result, Err(TermsmithError::InvalidConfig(_))));
        assert_eq!(builder.entries().len(), 1);
    }

    #[test]
    fn test_arrays_write_every_element() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder()
            .add(
                "Company",
                Value::Array(vec![Value::from("a"), Value::Null, Value::from("b")]),
            )
            .build();

        converter
            .convert(Some("orders/1"), None, &document.into(), &mut builder)
            .unwrap();

        let terms: Vec<_> = builder.entries()[0].terms_for(FieldId(1)).collect();
        assert_eq!(terms, vec![&b"a"[..], &b"b"[..]]);
    }

    #[test]
    fn test_nested_object_is_indexed_as_json() {
        let mut converter = converter(ConverterConfig::default());
        let mut builder = MemoryEntryBuilder::new();
        let address = Document::builder().add_text("City", "Hadera").build();
        let document = Document::builder().add("Company", address).build();

        converter
            .convert(Some("orders/1"), None, &document.into(), &mut builder)
            .unwrap();

        assert_eq!(
            builder.entries()[0].term(FieldId(1)),
            Some(&br#"{"City":"Hadera"}"#[..])
        );
    }

    #[test]
    fn test_source_document_id() {
        let catalog = Arc::new(
            FieldCatalog::builder()
                .field("Company")
                .with_source_document_id()
                .build()
                .unwrap(),
        );
        let analyzer = Arc::new(PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new())));
        let mut converter =
            DocumentConverter::new(catalog, analyzer, ConverterConfig::default()).unwrap();
        let mut builder = MemoryEntryBuilder::new();
        let document = Document::builder().add_text("Company", "c").build();

        converter
            .convert(
                Some("orders/1"),
                Some("companies/1"),
                &document.into(),
                &mut builder,
            )
            .unwrap();

        let entry = &builder.entries()[0];
        assert_eq!(entry.term(FieldId(2)), Some(&b"companies/1"[..]));
        assert_eq!(entry.terms[1].label.as_deref(), Some(SOURCE_DOCUMENT_ID_FIELD));
    }

    #[test]
    fn test_arity_rejected_at_construction() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"compound_fields": [["Year", "Month", "Company"]]}"#).unwrap();
        let catalog = catalog();
        let analyzer = Arc::new(PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new())));
        let result = DocumentConverter::new(catalog, analyzer, config);
        assert!(matches!(
            result,
            Err(TermsmithError::UnsupportedCompoundArity { .. })
        ));
    }

    #[test]
    fn test_fresh_copy() {
        let converter = converter(compound_config());
        let copy = converter.fresh_copy();
        assert_eq!(copy.compound_fields().count(), 1);
        assert_eq!(copy.field_buffer_capacity(), 0);
        assert_eq!(copy.config(), converter.config());
    }
}
