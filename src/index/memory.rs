//! In-memory index entry builder.

use serde::Serialize;

use crate::error::Result;
use crate::index::builder::IndexEntryBuilder;
use crate::schema::field::FieldId;
use crate::term::encoder::TermValue;

/// One term of an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryTerm {
    pub field: FieldId,
    /// Label of raw writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub term: Vec<u8>,
    pub value: TermValue,
}

/// A committed index entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub boost: f32,
    pub terms: Vec<EntryTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<serde_json::Value>,
}

impl IndexEntry {
    fn new() -> Self {
        IndexEntry {
            boost: 1.0,
            terms: Vec::new(),
            stored: None,
        }
    }

    /// Terms written for `field`, in write order.
    pub fn terms_for(&self, field: FieldId) -> impl Iterator<Item = &[u8]> + '_ {
        self.terms
            .iter()
            .filter(move |t| t.field == field)
            .map(|t| t.term.as_slice())
    }

    /// The first term written for `field`.
    pub fn term(&self, field: FieldId) -> Option<&[u8]> {
        self.terms_for(field).next()
    }

    /// Whether the entry holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Collects entries in memory.
#[derive(Debug)]
pub struct MemoryEntryBuilder {
    index_nulls: bool,
    draft: IndexEntry,
    entries: Vec<IndexEntry>,
    discarded: usize,
}

impl MemoryEntryBuilder {
    /// Create a builder that does not count null or empty values as content.
    pub fn new() -> Self {
        Self::with_index_nulls(false)
    }

    /// Create a builder; with `index_nulls` set, null and empty values are
    /// recorded and count as content.
    pub fn with_index_nulls(index_nulls: bool) -> Self {
        MemoryEntryBuilder {
            index_nulls,
            draft: IndexEntry::new(),
            entries: Vec::new(),
            discarded: 0,
        }
    }

    /// Committed entries.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Take the committed entries, leaving the builder empty.
    pub fn take_entries(&mut self) -> Vec<IndexEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Number of discarded drafts.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// The entry currently being built.
    pub fn draft(&self) -> &IndexEntry {
        &self.draft
    }
}

impl Default for MemoryEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexEntryBuilder for MemoryEntryBuilder {
    fn boost(&mut self, factor: f32) {
        self.draft.boost = factor;
    }

    fn write(&mut self, field: FieldId, term: &[u8], value: TermValue) -> Result<bool> {
        if value.is_empty() && !self.index_nulls {
            return Ok(false);
        }
        self.draft.terms.push(EntryTerm {
            field,
            label: None,
            term: term.to_vec(),
            value,
        });
        Ok(true)
    }

    fn write_raw(&mut self, field: FieldId, label: &str, bytes: &[u8]) -> Result<()> {
        self.draft.terms.push(EntryTerm {
            field,
            label: Some(label.to_string()),
            term: bytes.to_vec(),
            value: TermValue::Raw,
        });
        Ok(())
    }

    fn store(&mut self, snapshot: &serde_json::Value) -> Result<()> {
        self.draft.stored = Some(snapshot.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let entry = std::mem::replace(&mut self.draft, IndexEntry::new());
        self.entries.push(entry);
        Ok(())
    }

    fn discard(&mut self) {
        self.draft = IndexEntry::new();
        self.discarded += 1;
    }
}
