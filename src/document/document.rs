//! Document structure for dynamically shaped map output.

use crate::document::value::Value;

/// A document is an ordered collection of named field values.
///
/// Fields keep the order in which they were declared; enumeration through a
/// [`PropertyAccessor`](crate::document::accessor::PropertyAccessor) follows
/// this order. Adding a field whose name already exists replaces the value
/// in place.
#[derive(Clone, Debug, Default)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document { fields: Vec::new() }
    }

    /// Add a field value to the document.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Get the field at a declared position.
    pub fn field_at(&self, position: usize) -> Option<(&str, &Value)> {
        self.fields
            .get(position)
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        let position = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(position).1)
    }

    /// Get all field names in declared order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate over `(name, value)` pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field to the document.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document.add_field(name, Value::String(value.into()));
        self
    }

    /// Add an integer field to the document.
    pub fn add_integer<S: Into<String>>(mut self, name: S, value: i64) -> Self {
        self.document.add_field(name, Value::I64(value));
        self
    }

    /// Add a float field to the document.
    pub fn add_float<S: Into<String>>(mut self, name: S, value: f64) -> Self {
        self.document.add_field(name, Value::F64(value));
        self
    }

    /// Add a boolean field to the document.
    pub fn add_boolean<S: Into<String>>(mut self, name: S, value: bool) -> Self {
        self.document.add_field(name, Value::Boolean(value));
        self
    }

    /// Add a null field to the document.
    pub fn add_null<S: Into<String>>(mut self, name: S) -> Self {
        self.document.add_field(name, Value::Null);
        self
    }

    /// Add a field with any value convertible into a [`Value`].
    pub fn add<S: Into<String>, V: Into<Value>>(mut self, name: S, value: V) -> Self {
        self.document.add_field(name, value.into());
        self
    }

    /// Build the final document.
    pub fn build(self) -> Document {
        self.document
    }
}

/// A document together with an index-time boost factor.
#[derive(Clone, Debug)]
pub struct BoostedDocument {
    pub document: Document,
    pub boost: f32,
}

/// What an index map function produced for one source document.
#[derive(Clone, Debug)]
pub enum MapOutput {
    Document(Document),
    Boosted(BoostedDocument),
}

impl MapOutput {
    /// Wrap `document` with a boost factor.
    pub fn boosted(document: Document, boost: f32) -> Self {
        MapOutput::Boosted(BoostedDocument { document, boost })
    }

    /// The document, with any boost wrapper removed.
    pub fn document(&self) -> &Document {
        match self {
            MapOutput::Document(document) => document,
            MapOutput::Boosted(boosted) => &boosted.document,
        }
    }

    /// The boost factor, if the output is boosted.
    pub fn boost(&self) -> Option<f32> {
        match self {
            MapOutput::Document(_) => None,
            MapOutput::Boosted(boosted) => Some(boosted.boost),
        }
    }
}

impl From<Document> for MapOutput {
    fn from(document: Document) -> Self {
        MapOutput::Document(document)
    }
}
