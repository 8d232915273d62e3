//! Order-preserving term encoding.
//!
//! The [`TermEncoder`] turns one field value into the bytes written to the
//! index. Encodings are chosen so that byte-lexicographic order of the terms
//! equals the natural order of the values:
//!
//! | kind                         | term                                        |
//! |------------------------------|---------------------------------------------|
//! | null, empty string           | zero bytes                                  |
//! | string, enum, opaque string  | UTF-8 passed through the field analyzer     |
//! | integer, date/time ticks     | 8 bytes, sign bit flipped, big-endian       |
//! | double                       | 8 bytes, sortable bits, big-endian          |
//! | boolean                      | 1 byte, `0` or `1`                          |
//! | char                         | UTF-16 code units, 1 or 2 bytes each        |
//!
//! Terms are written into a caller-supplied [`ScratchBuffer`] at a
//! caller-supplied offset; the encoder reports how many bytes it wrote.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use termsmith::analysis::{KeywordAnalyzer, PerFieldAnalyzer};
//! use termsmith::document::Value;
//! use termsmith::schema::{FieldId, IndexField};
//! use termsmith::term::{ScratchBuffer, TermEncoder};
//!
//! let analyzer = Arc::new(PerFieldAnalyzer::new(Arc::new(KeywordAnalyzer::new())));
//! let mut encoder = TermEncoder::new(analyzer);
//! let mut buffer = ScratchBuffer::new();
//! let field = IndexField::new(FieldId(1), "Year");
//!
//! let encoded = encoder.encode(&field, &Value::I32(2021), &mut buffer, 0).unwrap();
//! assert_eq!(encoded.len, 8);
//! assert_eq!(buffer.region(0, 8), &[0x80, 0, 0, 0, 0, 0, 0x07, 0xE5]);
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::analyzer::TermAnalyzer;
use crate::document::value::Value;
use crate::error::{Result, TermsmithError};
use crate::schema::field::IndexField;
use crate::term::classify::{Classified, ValueKind, classify};
use crate::term::scratch::ScratchBuffer;
use crate::term::ticks;
use crate::util::bits::{
    code_unit_bytes, double_to_sortable_u64, normalize_double, read_u64_be,
    sortable_to_i64, sortable_i64, sortable_u64_to_double, write_u64_be,
};

/// Width of every numeric term.
pub const NUMERIC_TERM_LEN: usize = 8;

/// The typed value that accompanies a term when it is written to the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TermValue {
    Null,
    Empty,
    Text,
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Raw,
}

impl TermValue {
    /// Whether the term carries no content.
    pub fn is_empty(&self) -> bool {
        matches!(self, TermValue::Null | TermValue::Empty)
    }
}

/// Result of encoding one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoded {
    /// Bytes written at the requested offset.
    pub len: usize,
    /// Classification of the source value.
    pub kind: ValueKind,
    /// Typed form of the value.
    pub value: TermValue,
}

/// Encodes field values into index terms.
pub struct TermEncoder {
    analyzer: Arc<dyn TermAnalyzer>,
    analyzed: Vec<u8>,
}

impl TermEncoder {
    pub fn new(analyzer: Arc<dyn TermAnalyzer>) -> Self {
        TermEncoder {
            analyzer,
            analyzed: Vec::new(),
        }
    }

    /// The analyzer string values go through.
    pub fn analyzer(&self) -> &Arc<dyn TermAnalyzer> {
        &self.analyzer
    }

    /// Encode `value` for `field` into `buffer` at `offset`.
    pub fn encode(
        &mut self,
        field: &IndexField,
        value: &Value,
        buffer: &mut ScratchBuffer,
        offset: usize,
    ) -> Result<Encoded> {
        let classified = classify(value);
        let kind = classified.kind();

        let (len, term_value) = match classified {
            Classified::Null | Classified::DynamicNull => (0, TermValue::Null),
            Classified::EmptyString => (0, TermValue::Empty),

            Classified::Enum(text) | Classified::String(text) => {
                (self.analyze_into(field, text.as_bytes(), buffer, offset)?, TermValue::Text)
            }
            Classified::OpaqueString(bytes) => {
                (self.analyze_into(field, bytes, buffer, offset)?, TermValue::Text)
            }
            Classified::CompressedOpaqueString(compressed) => {
                let decompressed = compressed.decompress()?;
                (
                    self.analyze_into(field, decompressed.as_bytes(), buffer, offset)?,
                    TermValue::Text,
                )
            }

            Classified::DateTime(v) => {
                let ticks = ticks::datetime_ticks(&v)
                    .ok_or_else(|| out_of_tick_range(field, value))?;
                write_integer(ticks, buffer, offset)
            }
            Classified::DateTimeWithOffset(v) => {
                let ticks = ticks::offset_datetime_ticks(&v)
                    .ok_or_else(|| out_of_tick_range(field, value))?;
                write_integer(ticks, buffer, offset)
            }
            Classified::DateOnly(v) => {
                let ticks =
                    ticks::date_ticks(&v).ok_or_else(|| out_of_tick_range(field, value))?;
                write_integer(ticks, buffer, offset)
            }
            Classified::TimeOnly(v) => write_integer(ticks::time_ticks(&v), buffer, offset),
            Classified::TimeSpan(v) => {
                let ticks = ticks::timespan_ticks(&v).ok_or_else(|| {
                    TermsmithError::unsupported_value(
                        &field.name,
                        value.type_name(),
                        "duration does not fit in 64-bit ticks",
                    )
                })?;
                write_integer(ticks, buffer, offset)
            }

            Classified::Boolean(v) => {
                buffer.ensure_capacity(offset, 1)[0] = u8::from(v);
                (1, TermValue::Boolean(v))
            }

            Classified::IntegerLike(v) => write_integer(v, buffer, offset),

            Classified::Char(c) => (write_char(c, buffer, offset), TermValue::Raw),

            Classified::FloatLike(v) => {
                let v = normalize_double(v).ok_or_else(|| {
                    TermsmithError::unsupported_value(
                        &field.name,
                        value.type_name(),
                        "NaN has no position in the numeric order",
                    )
                })?;
                write_u64_be(
                    buffer.ensure_capacity(offset, NUMERIC_TERM_LEN),
                    double_to_sortable_u64(v),
                );
                (NUMERIC_TERM_LEN, TermValue::Double(v))
            }

            Classified::ConvertibleOther(other) => {
                let v = other.coerce_i64().ok_or_else(|| {
                    TermsmithError::unsupported_value(
                        &field.name,
                        other.type_name(),
                        "value cannot be converted to a 64-bit integer",
                    )
                })?;
                write_integer(v, buffer, offset)
            }
        };

        Ok(Encoded {
            len,
            kind,
            value: term_value,
        })
    }

    /// Encode raw UTF-8 text for `field`, bypassing classification.
    pub fn encode_text(
        &mut self,
        field: &IndexField,
        text: &[u8],
        buffer: &mut ScratchBuffer,
        offset: usize,
    ) -> Result<Encoded> {
        let (len, value) = if text.is_empty() {
            (0, TermValue::Empty)
        } else {
            (self.analyze_into(field, text, buffer, offset)?, TermValue::Text)
        };
        Ok(Encoded {
            len,
            kind: if text.is_empty() {
                ValueKind::EmptyString
            } else {
                ValueKind::String
            },
            value,
        })
    }

    fn analyze_into(
        &mut self,
        field: &IndexField,
        text: &[u8],
        buffer: &mut ScratchBuffer,
        offset: usize,
    ) -> Result<usize> {
        self.analyzed.clear();
        self.analyzer.analyze(field.id, text, &mut self.analyzed)?;
        Ok(buffer.write_at(offset, &self.analyzed))
    }
}

impl std::fmt::Debug for TermEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermEncoder")
            .field("analyzed_capacity", &self.analyzed.capacity())
            .finish()
    }
}

fn out_of_tick_range(field: &IndexField, value: &Value) -> TermsmithError {
    TermsmithError::unsupported_value(
        &field.name,
        value.type_name(),
        "date does not fit in 64-bit ticks",
    )
}

fn write_integer(value: i64, buffer: &mut ScratchBuffer, offset: usize) -> (usize, TermValue) {
    write_u64_be(
        buffer.ensure_capacity(offset, NUMERIC_TERM_LEN),
        sortable_i64(value),
    );
    (NUMERIC_TERM_LEN, TermValue::Integer(value))
}

fn write_char(c: char, buffer: &mut ScratchBuffer, offset: usize) -> usize {
    let mut units = [0u16; 2];
    let mut written = 0;
    for &unit in c.encode_utf16(&mut units).iter() {
        let (bytes, len) = code_unit_bytes(unit);
        written += buffer.write_at(offset + written, &bytes[..len]);
    }
    written
}

/// Decode an integer or tick term.
pub fn decode_integer_term(term: &[u8]) -> Option<i64> {
    (term.len() == NUMERIC_TERM_LEN).then(|| sortable_to_i64(read_u64_be(term)))
}

/// Decode a double term.
pub fn decode_double_term(term: &[u8]) -> Option<f64> {
    (term.len() == NUMERIC_TERM_LEN).then(|| sortable_u64_to_double(read_u64_be(term)))
}
