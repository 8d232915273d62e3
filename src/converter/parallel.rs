//! Parallel conversion of document batches.
//!
//! Converters are not shared between threads. Every rayon worker gets its
//! own converter, cloned from a template with
//! [`DocumentConverter::fresh_copy`], and its own in-memory builder.

use rayon::prelude::*;

use crate::converter::converter::{ConversionOutcome, DocumentConverter};
use crate::document::document::MapOutput;
use crate::error::Result;
use crate::index::builder::IndexEntryBuilder;
use crate::index::memory::{IndexEntry, MemoryEntryBuilder};

/// One document to convert.
#[derive(Debug, Clone)]
pub struct IndexItem {
    pub id: Option<String>,
    pub source_document_id: Option<String>,
    pub output: MapOutput,
}

impl IndexItem {
    pub fn new<S: Into<String>>(id: S, output: impl Into<MapOutput>) -> Self {
        IndexItem {
            id: Some(id.into()),
            source_document_id: None,
            output: output.into(),
        }
    }

    pub fn with_source_document_id<S: Into<String>>(mut self, source_document_id: S) -> Self {
        self.source_document_id = Some(source_document_id.into());
        self
    }
}

/// Convert `items` in parallel.
///
/// Results keep the order of `items`: `Ok(Some(entry))` for committed
/// documents, `Ok(None)` for skipped ones.
pub fn convert_batch(
    template: &DocumentConverter,
    items: &[IndexItem],
    index_nulls: bool,
) -> Vec<Result<Option<IndexEntry>>> {
    items
        .par_iter()
        .map_init(
            || {
                (
                    template.fresh_copy(),
                    MemoryEntryBuilder::with_index_nulls(index_nulls),
                )
            },
            |(converter, builder), item| convert_item(converter, builder, item),
        )
        .collect()
}

/// Convert one item with a private converter and builder.
pub fn convert_item(
    converter: &mut DocumentConverter,
    builder: &mut MemoryEntryBuilder,
    item: &IndexItem,
) -> Result<Option<IndexEntry>> {
    let outcome = converter.convert(
        item.id.as_deref(),
        item.source_document_id.as_deref(),
        &item.output,
        builder,
    );
    match outcome {
        Ok(ConversionOutcome::Committed) => Ok(builder.take_entries().pop()),
        Ok(ConversionOutcome::Skipped) => Ok(None),
        Err(e) => {
            builder.discard();
            Err(e)
        }
    }
}
