//! Document module for dynamically shaped map output.
//!
//! This module provides the document structure handed to the converter, the
//! runtime [`Value`] of its fields, the two [`PropertyAccessor`] strategies,
//! and JSON input.

pub mod accessor;
#[allow(clippy::module_inception)]
pub mod document;
pub mod json;
pub mod value;

// Re-export commonly used types
pub use accessor::{DynamicAccessor, PropertyAccessor, ShapeBoundAccessor};
pub use document::{BoostedDocument, Document, DocumentBuilder, MapOutput};
pub use value::{
    CompressedStringValue, CustomValue, EnumValue, LazyNumberValue, LazyStringValue, Value,
};
