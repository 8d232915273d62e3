//! JSON and JSON Lines input for documents.
//!
//! Converts JSON objects into [`Document`]s, keeping the key order of the
//! input:
//!
//! ```json
//! {"Company": "companies/5", "Year": 2021, "Freight": 32.38, "Lines": [1, 2]}
//! ```
//!
//! - strings become [`Value::String`]
//! - integral numbers become [`Value::I64`] (or [`Value::U64`] above `i64::MAX`)
//! - other numbers become [`Value::F64`]
//! - arrays and objects are converted recursively

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value as JsonValue;

use crate::document::document::Document;
use crate::document::value::Value;
use crate::error::{Result, TermsmithError};

/// Convert a JSON value into a field value.
pub fn value_from_json(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::I64(i)
            } else if let Some(u) = n.as_u64() {
                Value::U64(u)
            } else {
                n.as_f64().map_or(Value::Null, Value::F64)
            }
        }
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Array(items.iter().map(value_from_json).collect()),
        JsonValue::Object(map) => {
            let mut doc = Document::new();
            for (key, value) in map {
                doc.add_field(key.clone(), value_from_json(value));
            }
            Value::Object(doc)
        }
    }
}

/// Convert a JSON object into a document.
pub fn document_from_json(json: &JsonValue) -> Result<Document> {
    match value_from_json(json) {
        Value::Object(doc) => Ok(doc),
        _ => Err(TermsmithError::other(format!(
            "expected a JSON object, got: {}",
            json_type_name(json)
        ))),
    }
}

/// Parse a JSON object from text.
pub fn document_from_json_str(text: &str) -> Result<Document> {
    let json: JsonValue = serde_json::from_str(text)?;
    document_from_json(&json)
}

fn json_type_name(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Iterator over the documents of a JSON Lines source. Blank lines are
/// skipped.
pub struct JsonlDocuments<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonlDocuments<R> {
    pub fn new(reader: R) -> Self {
        JsonlDocuments {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl JsonlDocuments<BufReader<File>> {
    /// Open a JSON Lines file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(JsonlDocuments::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for JsonlDocuments<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let line = self.line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(document_from_json_str(line).map_err(|e| {
                        TermsmithError::other(format!("line {}: {e}", self.line_number))
                    }));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
