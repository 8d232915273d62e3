//! Schema module for Termsmith.
//!
//! This module provides the field catalog an index is built against and the
//! declarations of compound fields.

pub mod catalog;
pub mod compound;
pub mod field;

// Re-export commonly used types
pub use catalog::{
    DOCUMENT_ID_FIELD, FieldCatalog, FieldCatalogBuilder, FieldCatalogDefinition,
    FieldDefinition, ReservedField, SOURCE_DOCUMENT_ID_FIELD,
};
pub use compound::CompoundFieldSpec;
pub use field::{FieldId, IndexField};
