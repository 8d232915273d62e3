//! Value classification.
//!
//! Every [`Value`] maps to exactly one [`ValueKind`]. Classification is
//! total: values with no direct encoding fall into
//! [`ValueKind::ConvertibleOther`] and are coerced to an integer by the
//! encoder, which is the only place a value can be rejected.
//!
//! Precedence, first match wins:
//!
//! 1. nulls and empty strings
//! 2. enumerations
//! 3. strings (native, pre-decoded, compressed)
//! 4. the date/time family
//! 5. booleans
//! 6. fixed-width integers, widened to `i64`
//! 7. chars
//! 8. host types that convert to a number
//! 9. floats and lazily parsed numbers
//! 10. everything else

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::document::value::{CompressedStringValue, Value};

/// Semantic kind of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    EmptyString,
    DynamicNull,
    Enum,
    String,
    OpaqueString,
    CompressedOpaqueString,
    DateTime,
    DateTimeWithOffset,
    DateOnly,
    TimeOnly,
    TimeSpan,
    Boolean,
    Char,
    IntegerLike,
    FloatLike,
    ConvertibleOther,
}

impl ValueKind {
    /// Classify `value` without keeping its payload.
    pub fn of(value: &Value) -> ValueKind {
        classify(value).kind()
    }

    /// Whether values of this kind encode to zero bytes.
    pub fn is_empty_term(self) -> bool {
        matches!(
            self,
            ValueKind::Null | ValueKind::EmptyString | ValueKind::DynamicNull
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A classified value together with the payload its encoding needs.
#[derive(Debug, Clone, Copy)]
pub enum Classified<'a> {
    Null,
    EmptyString,
    DynamicNull,
    /// Textual form of the enumeration value.
    Enum(&'a str),
    String(&'a str),
    OpaqueString(&'a [u8]),
    CompressedOpaqueString(&'a CompressedStringValue),
    DateTime(NaiveDateTime),
    DateTimeWithOffset(DateTime<FixedOffset>),
    DateOnly(NaiveDate),
    TimeOnly(NaiveTime),
    TimeSpan(TimeDelta),
    Boolean(bool),
    Char(char),
    IntegerLike(i64),
    FloatLike(f64),
    ConvertibleOther(&'a Value),
}

impl Classified<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Classified::Null => ValueKind::Null,
            Classified::EmptyString => ValueKind::EmptyString,
            Classified::DynamicNull => ValueKind::DynamicNull,
            Classified::Enum(_) => ValueKind::Enum,
            Classified::String(_) => ValueKind::String,
            Classified::OpaqueString(_) => ValueKind::OpaqueString,
            Classified::CompressedOpaqueString(_) => ValueKind::CompressedOpaqueString,
            Classified::DateTime(_) => ValueKind::DateTime,
            Classified::DateTimeWithOffset(_) => ValueKind::DateTimeWithOffset,
            Classified::DateOnly(_) => ValueKind::DateOnly,
            Classified::TimeOnly(_) => ValueKind::TimeOnly,
            Classified::TimeSpan(_) => ValueKind::TimeSpan,
            Classified::Boolean(_) => ValueKind::Boolean,
            Classified::Char(_) => ValueKind::Char,
            Classified::IntegerLike(_) => ValueKind::IntegerLike,
            Classified::FloatLike(_) => ValueKind::FloatLike,
            Classified::ConvertibleOther(_) => ValueKind::ConvertibleOther,
        }
    }
}

/// Classify a value.
pub fn classify(value: &Value) -> Classified<'_> {
    match value {
        Value::Null => Classified::Null,
        Value::DynamicNull => Classified::DynamicNull,
        Value::String(s) if s.is_empty() => Classified::EmptyString,
        Value::LazyString(s) if s.is_empty() => Classified::EmptyString,
        Value::CompressedString(s) if s.uncompressed_len() == 0 => Classified::EmptyString,

        Value::Enum(e) => Classified::Enum(&e.name),

        Value::String(s) => Classified::String(s),
        Value::LazyString(s) => Classified::OpaqueString(s.as_bytes()),
        Value::CompressedString(s) => Classified::CompressedOpaqueString(s),

        Value::DateTime(v) => Classified::DateTime(*v),
        Value::DateTimeOffset(v) => Classified::DateTimeWithOffset(*v),
        Value::Date(v) => Classified::DateOnly(*v),
        Value::Time(v) => Classified::TimeOnly(*v),
        Value::TimeSpan(v) => Classified::TimeSpan(*v),

        Value::Boolean(v) => Classified::Boolean(*v),

        Value::I8(v) => Classified::IntegerLike(i64::from(*v)),
        Value::I16(v) => Classified::IntegerLike(i64::from(*v)),
        Value::I32(v) => Classified::IntegerLike(i64::from(*v)),
        Value::I64(v) => Classified::IntegerLike(*v),
        Value::U8(v) => Classified::IntegerLike(i64::from(*v)),
        Value::U16(v) => Classified::IntegerLike(i64::from(*v)),
        Value::U32(v) => Classified::IntegerLike(i64::from(*v)),
        // wraps above i64::MAX
        Value::U64(v) => Classified::IntegerLike(*v as i64),

        Value::Char(c) => Classified::Char(*c),

        Value::Custom(c) => match c.to_f64() {
            Some(f) => Classified::FloatLike(f),
            None => Classified::ConvertibleOther(value),
        },

        Value::F32(v) => Classified::FloatLike(f64::from(*v)),
        Value::F64(v) => Classified::FloatLike(*v),
        Value::LazyNumber(n) => Classified::FloatLike(n.to_f64()),

        Value::Array(_) | Value::Object(_) => Classified::ConvertibleOther(value),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::document::value::{
        CustomValue, EnumValue, LazyNumberValue, LazyStringValue,
    };

    #[derive(Debug)]
    struct Money(f64);

    impl CustomValue for Money {
        fn type_name(&self) -> &str {
            "Money"
        }

        fn to_f64(&self) -> Option<f64> {
            Some(self.0)
        }
    }

    #[derive(Debug)]
    struct Opaque;

    impl CustomValue for Opaque {
        fn type_name(&self) -> &str {
            "Opaque"
        }
    }

    #[test]
    fn test_nulls_and_empty() {
        assert_eq!(ValueKind::of(&Value::Null), ValueKind::Null);
        assert_eq!(ValueKind::of(&Value::DynamicNull), ValueKind::DynamicNull);
        assert_eq!(ValueKind::of(&Value::from("")), ValueKind::EmptyString);
        assert_eq!(
            ValueKind::of(&Value::LazyString(LazyStringValue::new(Vec::new()))),
            ValueKind::EmptyString
        );
        assert!(ValueKind::EmptyString.is_empty_term());
        assert!(!ValueKind::String.is_empty_term());
    }

    #[test]
    fn test_strings() {
        assert_eq!(ValueKind::of(&Value::from("a")), ValueKind::String);
        assert_eq!(
            ValueKind::of(&Value::LazyString(LazyStringValue::from("a"))),
            ValueKind::OpaqueString
        );
        assert_eq!(
            ValueKind::of(&Value::Enum(EnumValue::new("Status", "Active"))),
            ValueKind::Enum
        );
        match classify(&Value::Enum(EnumValue::new("Status", "Active"))) {
            Classified::Enum(name) => assert_eq!(name, "Active"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_integers_widen() {
        for value in [
            Value::I8(-3),
            Value::I16(-3),
            Value::I32(-3),
            Value::I64(-3),
        ] {
            assert!(matches!(classify(&value), Classified::IntegerLike(-3)));
        }
        assert!(matches!(
            classify(&Value::U32(u32::MAX)),
            Classified::IntegerLike(4_294_967_295)
        ));
        assert!(matches!(
            classify(&Value::U64(u64::MAX)),
            Classified::IntegerLike(-1)
        ));
    }

    #[test]
    fn test_date_family() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(ValueKind::of(&Value::Date(date)), ValueKind::DateOnly);
        assert_eq!(
            ValueKind::of(&Value::DateTime(date.and_hms_opt(0, 0, 0).unwrap())),
            ValueKind::DateTime
        );
        assert_eq!(
            ValueKind::of(&Value::TimeSpan(TimeDelta::seconds(5))),
            ValueKind::TimeSpan
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(ValueKind::of(&Value::F32(1.5)), ValueKind::FloatLike);
        assert_eq!(ValueKind::of(&Value::F64(1.5)), ValueKind::FloatLike);
        assert_eq!(
            ValueKind::of(&Value::LazyNumber(LazyNumberValue::new("3.25"))),
            ValueKind::FloatLike
        );
        assert_eq!(ValueKind::of(&Value::Char('x')), ValueKind::Char);
        assert_eq!(ValueKind::of(&Value::Boolean(true)), ValueKind::Boolean);
    }

    #[test]
    fn test_custom_values() {
        let money = Value::Custom(Arc::new(Money(9.5)));
        assert!(matches!(classify(&money), Classified::FloatLike(v) if v == 9.5));

        let opaque = Value::Custom(Arc::new(Opaque));
        assert_eq!(ValueKind::of(&opaque), ValueKind::ConvertibleOther);
        assert_eq!(
            ValueKind::of(&Value::Array(vec![Value::I32(1)])),
            ValueKind::ConvertibleOther
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::IntegerLike.to_string(), "IntegerLike");
        assert_eq!(
            serde_json::to_string(&ValueKind::FloatLike).unwrap(),
            "\"FloatLike\""
        );
    }
}
