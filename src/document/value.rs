//! Runtime values of document fields.
//!
//! Documents handed to the converter are dynamically shaped: every field
//! carries a [`Value`] whose variant is only known at run time. The variants
//! cover everything an index map function can produce:
//!
//! - **Nulls** - [`Value::Null`] and the [`Value::DynamicNull`] sentinel
//! - **Strings** - native strings, pre-decoded UTF-8 ([`LazyStringValue`])
//!   and LZ4-compressed UTF-8 ([`CompressedStringValue`])
//! - **Enumerations** - [`EnumValue`], indexed through their textual form
//! - **Date/time family** - chrono dates, times, offsets and durations
//! - **Scalars** - booleans, chars, every fixed-width integer, floats and
//!   lazily parsed numbers ([`LazyNumberValue`])
//! - **Containers** - arrays and nested objects
//! - **Host types** - [`Value::Custom`] wrapping a [`CustomValue`]
//!
//! # Examples
//!
//! ```
//! use termsmith::document::value::Value;
//!
//! let name = Value::from("companies/5");
//! let year = Value::from(2021i32);
//! let price = Value::from(39.99f64);
//!
//! assert_eq!(name.type_name(), "string");
//! assert_eq!(year.type_name(), "i32");
//! assert_eq!(price.to_string(), "39.99");
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::document::document::Document;
use crate::error::{Result, TermsmithError};

/// A host type that can appear as a field value.
///
/// Implementations opt into the conversions they support. A type that
/// returns `Some` from [`to_f64`](Self::to_f64) is indexed as a floating
/// point number; otherwise the converter falls back to
/// [`to_i64`](Self::to_i64) and rejects the value when that fails too.
pub trait CustomValue: fmt::Debug + Send + Sync {
    /// Name of the concrete runtime type, used in error messages.
    fn type_name(&self) -> &str;

    /// Numeric conversion capability. `None` means the type does not
    /// convert to a number at all.
    fn to_f64(&self) -> Option<f64> {
        None
    }

    /// Best-effort integer coercion.
    fn to_i64(&self) -> Option<i64> {
        None
    }

    /// JSON form for stored snapshots. `None` omits the value from the
    /// snapshot without affecting indexing.
    fn to_json(&self) -> Option<serde_json::Value> {
        None
    }
}

/// A string whose UTF-8 bytes were produced ahead of time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyStringValue {
    bytes: Vec<u8>,
}

impl LazyStringValue {
    /// Wrap already encoded UTF-8 bytes. The bytes are not validated.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        LazyStringValue {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The content as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

impl From<&str> for LazyStringValue {
    fn from(value: &str) -> Self {
        LazyStringValue::new(value.as_bytes())
    }
}

/// An LZ4 block-compressed UTF-8 string.
///
/// Must be decompressed into a [`LazyStringValue`] before it can be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedStringValue {
    compressed: Vec<u8>,
    uncompressed_len: usize,
}

impl CompressedStringValue {
    /// Compress `text`.
    pub fn compress(text: &str) -> Result<Self> {
        let compressed = lz4::block::compress(text.as_bytes(), None, false)?;
        Ok(CompressedStringValue {
            compressed,
            uncompressed_len: text.len(),
        })
    }

    /// Wrap an existing LZ4 block and the length of its uncompressed content.
    pub fn from_parts(compressed: Vec<u8>, uncompressed_len: usize) -> Self {
        CompressedStringValue {
            compressed,
            uncompressed_len,
        }
    }

    pub fn compressed_bytes(&self) -> &[u8] {
        &self.compressed
    }

    pub fn uncompressed_len(&self) -> usize {
        self.uncompressed_len
    }

    /// Decompress into a lazy string.
    pub fn decompress(&self) -> Result<LazyStringValue> {
        let size = i32::try_from(self.uncompressed_len).map_err(|_| {
            TermsmithError::decompression(format!(
                "uncompressed length {} is too large",
                self.uncompressed_len
            ))
        })?;
        let bytes = lz4::block::decompress(&self.compressed, Some(size))
            .map_err(|e| TermsmithError::decompression(e.to_string()))?;
        if bytes.len() != self.uncompressed_len {
            return Err(TermsmithError::decompression(format!(
                "expected {} bytes, got {}",
                self.uncompressed_len,
                bytes.len()
            )));
        }
        Ok(LazyStringValue::new(bytes))
    }
}

/// A number kept in its textual form until it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyNumberValue {
    text: String,
}

impl LazyNumberValue {
    pub fn new(text: impl Into<String>) -> Self {
        LazyNumberValue { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parse as a double; unparsable text yields NaN.
    pub fn to_f64(&self) -> f64 {
        self.text.trim().parse::<f64>().unwrap_or(f64::NAN)
    }
}

/// A value of an enumeration type, indexed by the name of its variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: String,
    pub name: String,
}

impl EnumValue {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        EnumValue {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// Represents the runtime value of a document field.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Explicit "dynamic null" sentinel produced by map functions
    DynamicNull,
    /// Native string
    String(String),
    /// Pre-decoded UTF-8 string
    LazyString(LazyStringValue),
    /// LZ4-compressed UTF-8 string
    CompressedString(CompressedStringValue),
    /// Enumeration value
    Enum(EnumValue),
    /// Date and time without offset
    DateTime(NaiveDateTime),
    /// Date and time with a UTC offset
    DateTimeOffset(DateTime<FixedOffset>),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Signed duration
    TimeSpan(TimeDelta),
    Boolean(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    /// Number kept as text
    LazyNumber(LazyNumberValue),
    /// Array of values
    Array(Vec<Value>),
    /// Nested object
    Object(Document),
    /// Host type
    Custom(Arc<dyn CustomValue>),
}

impl Value {
    /// Name of the runtime type of this value.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::DynamicNull => "dynamic_null",
            Value::String(_) => "string",
            Value::LazyString(_) => "lazy_string",
            Value::CompressedString(_) => "compressed_string",
            Value::Enum(e) => &e.type_name,
            Value::DateTime(_) => "datetime",
            Value::DateTimeOffset(_) => "datetime_offset",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::TimeSpan(_) => "timespan",
            Value::Boolean(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::LazyNumber(_) => "lazy_number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Custom(c) => c.type_name(),
        }
    }

    /// Whether this is either kind of null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::DynamicNull)
    }

    /// Best-effort integer coercion for values with no direct encoding.
    pub fn coerce_i64(&self) -> Option<i64> {
        match self {
            Value::Custom(c) => c.to_i64(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::DynamicNull => write!(f, "null"),
            Value::String(s) => write!(f, "{s}"),
            Value::LazyString(s) => write!(f, "{}", String::from_utf8_lossy(s.as_bytes())),
            Value::CompressedString(s) => {
                write!(f, "<compressed string, {} bytes>", s.uncompressed_len())
            }
            Value::Enum(e) => write!(f, "{}", e.name),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::DateTimeOffset(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Time(v) => write!(f, "{v}"),
            Value::TimeSpan(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::LazyNumber(v) => write!(f, "{}", v.as_str()),
            Value::Array(items) => write!(f, "<array of {}>", items.len()),
            Value::Object(doc) => write!(f, "<object with {} fields>", doc.len()),
            Value::Custom(c) => write!(f, "<{}>", c.type_name()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    String => String,
    LazyStringValue => LazyString,
    CompressedStringValue => CompressedString,
    EnumValue => Enum,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    NaiveDate => Date,
    NaiveTime => Time,
    TimeDelta => TimeSpan,
    bool => Boolean,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    LazyNumberValue => LazyNumber,
    Vec<Value> => Array,
    Document => Object,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
