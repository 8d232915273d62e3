//! Index entry builder trait.
//!
//! The converter never persists anything itself. It drives an
//! [`IndexEntryBuilder`] that accumulates the terms of one document (the
//! entry draft) and either commits or discards them.

use crate::error::Result;
use crate::schema::field::FieldId;
use crate::term::encoder::TermValue;

/// Receiver of the terms of one document at a time.
///
/// Calls for a document arrive in order: an optional [`boost`](Self::boost),
/// field writes, an optional [`store`](Self::store), the identifier writes
/// and finally [`commit`](Self::commit) or [`discard`](Self::discard).
pub trait IndexEntryBuilder: Send + std::fmt::Debug {
    /// Set the boost factor of the current entry.
    fn boost(&mut self, factor: f32);

    /// Write one term. Returns whether the term counts as indexable content.
    fn write(&mut self, field: FieldId, term: &[u8], value: TermValue) -> Result<bool>;

    /// Write raw bytes under a label, outside of analysis (identifiers).
    fn write_raw(&mut self, field: FieldId, label: &str, bytes: &[u8]) -> Result<()>;

    /// Attach the stored snapshot of the document.
    fn store(&mut self, snapshot: &serde_json::Value) -> Result<()>;

    /// Commit the current entry.
    fn commit(&mut self) -> Result<()>;

    /// Drop the current entry.
    fn discard(&mut self);
}
