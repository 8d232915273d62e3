//! Property accessors enumerate and resolve the fields of a document.
//!
//! Two strategies exist, chosen when the converter is configured:
//!
//! - [`ShapeBoundAccessor`] is built once from the first document a
//!   converter sees and memoizes that document's [`DocumentShape`]. Every
//!   later document must have exactly the same field names in the same
//!   order. Lookups by name are a single hash probe.
//! - [`DynamicAccessor`] resolves each document on its own and therefore
//!   supports heterogeneous shapes (multi-source indexes), paying a linear
//!   scan per lookup.
//!
//! Neither accessor mutates the document and both enumerate fields in the
//! document's declared order.
//!
//! # Examples
//!
//! ```
//! use termsmith::document::accessor::{PropertyAccessor, ShapeBoundAccessor};
//! use termsmith::document::document::Document;
//!
//! let first = Document::builder().add_text("Name", "a").add_integer("Age", 1).build();
//! let accessor = ShapeBoundAccessor::from_document(&first);
//!
//! let second = Document::builder().add_text("Name", "b").add_integer("Age", 2).build();
//! let names: Vec<_> = accessor.properties(&second).map(|(name, _)| name).collect();
//! assert_eq!(names, vec!["Name", "Age"]);
//! assert_eq!(accessor.get_value(&second, "Age").unwrap().to_string(), "2");
//! ```

use std::sync::Arc;

use ahash::AHashMap;

use crate::document::document::Document;
use crate::document::value::Value;
use crate::error::{Result, TermsmithError};

/// Capability to enumerate and resolve the named values of a document.
pub trait PropertyAccessor {
    /// Enumerate `(field_name, value)` pairs in declared order.
    fn properties<'d>(&'d self, document: &'d Document) -> Properties<'d>;

    /// Resolve a single field by name.
    fn get_value<'d>(&self, document: &'d Document, name: &str) -> Option<&'d Value>;
}

/// Iterator over the properties of a document.
#[derive(Debug, Clone)]
pub struct Properties<'d> {
    document: &'d Document,
    names: Option<&'d [String]>,
    position: usize,
    end: usize,
}

impl<'d> Iterator for Properties<'d> {
    type Item = (&'d str, &'d Value);

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.end {
            return None;
        }
        let (document_name, value) = self.document.field_at(self.position)?;
        let name = match self.names {
            Some(names) => names[self.position].as_str(),
            None => document_name,
        };
        self.position += 1;
        Some((name, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

/// The ordered field names of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentShape {
    names: Vec<String>,
    positions: AHashMap<String, usize>,
}

impl DocumentShape {
    /// Capture the shape of `document`.
    pub fn of(document: &Document) -> Self {
        let names: Vec<String> = document.fields().map(|(name, _)| name.to_string()).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect();
        DocumentShape { names, positions }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declared position of a field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Whether `document` has exactly this shape.
    pub fn matches(&self, document: &Document) -> bool {
        document.len() == self.names.len()
            && document
                .fields()
                .zip(&self.names)
                .all(|((name, _), expected)| name == expected)
    }
}

/// Accessor memoized against one concrete document shape.
///
/// Using it on a document of another shape is a configuration error.
/// [`ShapeBoundAccessor::check`] rejects documents with a different field
/// count; debug builds also assert that the names match.
#[derive(Debug, Clone)]
pub struct ShapeBoundAccessor {
    shape: DocumentShape,
}

impl ShapeBoundAccessor {
    /// Build the accessor from the shape of `document`.
    pub fn from_document(document: &Document) -> Self {
        ShapeBoundAccessor {
            shape: DocumentShape::of(document),
        }
    }

    pub fn shape(&self) -> &DocumentShape {
        &self.shape
    }

    /// Reject a document whose field count differs from the bound shape.
    pub fn check(&self, document: &Document) -> Result<()> {
        if document.len() != self.shape.len() {
            return Err(TermsmithError::invalid_config(format!(
                "document with fields [{}] does not match the bound shape [{}]; \
                 use the dynamic accessor for indexes with several document shapes",
                document.field_names().join(", "),
                self.shape.names().join(", ")
            )));
        }
        Ok(())
    }
}

impl PropertyAccessor for ShapeBoundAccessor {
    fn properties<'d>(&'d self, document: &'d Document) -> Properties<'d> {
        debug_assert!(
            self.shape.matches(document),
            "document shape {:?} differs from the bound shape {:?}",
            document.field_names(),
            self.shape.names()
        );
        Properties {
            document,
            names: Some(self.shape.names()),
            position: 0,
            end: self.shape.len(),
        }
    }

    fn get_value<'d>(&self, document: &'d Document, name: &str) -> Option<&'d Value> {
        let position = self.shape.position(name)?;
        document.field_at(position).map(|(_, value)| value)
    }
}

/// Accessor resolved for every document; supports varying shapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicAccessor;

impl PropertyAccessor for DynamicAccessor {
    fn properties<'d>(&'d self, document: &'d Document) -> Properties<'d> {
        Properties {
            document,
            names: None,
            position: 0,
            end: document.len(),
        }
    }

    fn get_value<'d>(&self, document: &'d Document, name: &str) -> Option<&'d Value> {
        document.get_field(name)
    }
}

/// The accessor a converter uses for one call.
#[derive(Debug, Clone)]
pub enum BoundAccessor {
    ShapeBound(Arc<ShapeBoundAccessor>),
    Dynamic(DynamicAccessor),
}

impl BoundAccessor {
    /// Check that `document` can be read through this accessor.
    pub fn check(&self, document: &Document) -> Result<()> {
        match self {
            BoundAccessor::ShapeBound(accessor) => accessor.check(document),
            BoundAccessor::Dynamic(_) => Ok(()),
        }
    }
}

impl PropertyAccessor for BoundAccessor {
    fn properties<'d>(&'d self, document: &'d Document) -> Properties<'d> {
        match self {
            BoundAccessor::ShapeBound(accessor) => accessor.properties(document),
            BoundAccessor::Dynamic(accessor) => accessor.properties(document),
        }
    }

    fn get_value<'d>(&self, document: &'d Document, name: &str) -> Option<&'d Value> {
        match self {
            BoundAccessor::ShapeBound(accessor) => accessor.get_value(document, name),
            BoundAccessor::Dynamic(accessor) => accessor.get_value(document, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(year: i64, month: i64) -> Document {
        Document::builder()
            .add_integer("Year", year)
            .add_integer("Month", month)
            .add_text("Company", "companies/1")
            .build()
    }

    #[test]
    fn test_shape_matches() {
        let shape = DocumentShape::of(&order(2021, 3));
        assert!(shape.matches(&order(1999, 12)));
        assert_eq!(shape.position("Company"), Some(2));

        let other = Document::builder().add_integer("Year", 1).build();
        assert!(!shape.matches(&other));
    }

    #[test]
    fn test_shape_bound_reuse() {
        let accessor = ShapeBoundAccessor::from_document(&order(2021, 3));
        let doc = order(2022, 4);

        let pairs: Vec<_> = accessor
            .properties(&doc)
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Year".to_string(), "2022".to_string()),
                ("Month".to_string(), "4".to_string()),
                ("Company".to_string(), "companies/1".to_string()),
            ]
        );
        assert_eq!(accessor.get_value(&doc, "Month").unwrap().to_string(), "4");
        assert!(accessor.get_value(&doc, "Missing").is_none());
    }

    #[test]
    fn test_shape_bound_rejects_other_field_count() {
        let accessor = ShapeBoundAccessor::from_document(&order(2021, 3));
        assert!(accessor.check(&order(2022, 4)).is_ok());

        let shorter = Document::builder().add_integer("Year", 2021).build();
        assert!(matches!(
            accessor.check(&shorter),
            Err(TermsmithError::InvalidConfig(_))
        ));

        let bound = BoundAccessor::ShapeBound(Arc::new(accessor));
        assert!(bound.check(&shorter).is_err());
        assert!(BoundAccessor::Dynamic(DynamicAccessor).check(&shorter).is_ok());
    }

    #[test]
    fn test_dynamic_handles_different_shapes() {
        let accessor = DynamicAccessor;
        let first = order(2021, 3);
        let second = Document::builder().add_text("Name", "x").build();

        assert_eq!(accessor.properties(&first).count(), 3);
        assert_eq!(accessor.properties(&second).count(), 1);
        assert_eq!(accessor.get_value(&second, "Name").unwrap().to_string(), "x");
    }

    #[test]
    fn test_properties_size_hint() {
        let doc = order(1, 2);
        let accessor = DynamicAccessor;
        let mut properties = accessor.properties(&doc);
        assert_eq!(properties.size_hint(), (3, Some(3)));
        properties.next();
        assert_eq!(properties.size_hint(), (2, Some(2)));
    }
}
