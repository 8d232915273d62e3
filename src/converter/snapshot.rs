//! JSON snapshots of field values.
//!
//! When a converter stores values, every field value is also turned into
//! JSON so that the original document can be reconstructed without the
//! source. Conversion is best-effort: values with no JSON form return `None`
//! and are left out of the snapshot (they are still indexed).

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde_json::{Map, Number, Value as JsonValue};

use crate::document::value::Value;
use crate::term::ticks::{TICKS_PER_DAY, TICKS_PER_SECOND, timespan_ticks};

/// JSON form of a field value.
///
/// Nested arrays are flattened into a single list.
pub fn to_stored_json(value: &Value) -> Option<JsonValue> {
    let json = match value {
        Value::Null | Value::DynamicNull => JsonValue::Null,
        Value::String(s) => JsonValue::String(s.clone()),
        Value::LazyString(s) => JsonValue::String(s.as_str()?.to_string()),
        Value::CompressedString(s) => {
            let decompressed = s.decompress().ok()?;
            JsonValue::String(decompressed.as_str()?.to_string())
        }
        Value::Enum(e) => JsonValue::String(e.name.clone()),

        Value::DateTime(v) => JsonValue::String(format_datetime(v)),
        Value::DateTimeOffset(v) => JsonValue::String(format!(
            "{}{}",
            format_datetime(&v.naive_local()),
            v.format("%:z")
        )),
        Value::Date(v) => JsonValue::String(v.format("%Y-%m-%d").to_string()),
        Value::Time(v) => JsonValue::String(format_time(v)),
        Value::TimeSpan(v) => JsonValue::String(format_timespan(v)?),

        Value::Boolean(v) => JsonValue::Bool(*v),
        Value::Char(c) => JsonValue::String(c.to_string()),

        Value::I8(v) => JsonValue::from(*v),
        Value::I16(v) => JsonValue::from(*v),
        Value::I32(v) => JsonValue::from(*v),
        Value::I64(v) => JsonValue::from(*v),
        Value::U8(v) => JsonValue::from(*v),
        Value::U16(v) => JsonValue::from(*v),
        Value::U32(v) => JsonValue::from(*v),
        Value::U64(v) => JsonValue::from(*v),
        Value::F32(v) => JsonValue::Number(Number::from_f64(f64::from(*v))?),
        Value::F64(v) => JsonValue::Number(Number::from_f64(*v)?),
        Value::LazyNumber(n) => JsonValue::Number(n.as_str().trim().parse::<Number>().ok()?),

        Value::Array(items) => {
            let mut flat = Vec::with_capacity(items.len());
            flatten_into(items, &mut flat);
            JsonValue::Array(flat)
        }
        Value::Object(doc) => {
            let mut map = Map::with_capacity(doc.len());
            for (name, field) in doc.fields() {
                if let Some(json) = to_stored_json(field) {
                    map.insert(name.to_string(), json);
                }
            }
            JsonValue::Object(map)
        }
        Value::Custom(c) => c.to_json()?,
    };
    Some(json)
}

fn flatten_into(items: &[Value], out: &mut Vec<JsonValue>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten_into(nested, out),
            other => {
                if let Some(json) = to_stored_json(other) {
                    out.push(json);
                }
            }
        }
    }
}

fn fraction_ticks(nanos: u32) -> u32 {
    nanos.min(999_999_999) / 100
}

fn format_datetime(value: &NaiveDateTime) -> String {
    format!(
        "{}.{:07}",
        value.format("%Y-%m-%dT%H:%M:%S"),
        fraction_ticks(value.nanosecond())
    )
}

fn format_time(value: &NaiveTime) -> String {
    format!(
        "{}.{:07}",
        value.format("%H:%M:%S"),
        fraction_ticks(value.nanosecond())
    )
}

/// `[-][d.]hh:mm:ss[.fffffff]`
fn format_timespan(value: &TimeDelta) -> Option<String> {
    let ticks = timespan_ticks(value)?;
    let sign = if ticks < 0 { "-" } else { "" };
    let ticks = ticks.unsigned_abs();

    let per_day = TICKS_PER_DAY as u64;
    let per_second = TICKS_PER_SECOND as u64;
    let days = ticks / per_day;
    let seconds = (ticks % per_day) / per_second;
    let fraction = ticks % per_second;

    let mut out = String::from(sign);
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    ));
    if fraction > 0 {
        out.push_str(&format!(".{fraction:07}"));
    }
    Some(out)
}
