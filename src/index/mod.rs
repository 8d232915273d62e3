//! Index entry builders.
//!
//! This module provides the [`IndexEntryBuilder`] contract the converter
//! writes to and an in-memory implementation.

pub mod builder;
pub mod memory;

// Re-export commonly used types
pub use builder::IndexEntryBuilder;
pub use memory::{EntryTerm, IndexEntry, MemoryEntryBuilder};
