//! Tick counts for date and time values.
//!
//! A tick is 100 nanoseconds. Date/time values are indexed as the signed
//! 64-bit tick count of the instant (or duration) they represent, counted
//! from `0001-01-01T00:00:00` for points in time and from midnight for
//! times of day.
//!
//! Dates far enough from year 1 (beyond roughly ±29,000 years) have no
//! 64-bit tick count; the point-in-time functions return `None` for them.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// Ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks in one day.
pub const TICKS_PER_DAY: i64 = 86_400 * TICKS_PER_SECOND;

const NANOS_PER_TICK: i64 = 100;

/// Ticks since `0001-01-01T00:00:00`.
pub fn datetime_ticks(value: &NaiveDateTime) -> Option<i64> {
    date_ticks(&value.date())?.checked_add(time_ticks(&value.time()))
}

/// Ticks of the UTC instant of an offset date/time.
pub fn offset_datetime_ticks(value: &DateTime<FixedOffset>) -> Option<i64> {
    datetime_ticks(&value.naive_utc())
}

/// Ticks of the start of the day.
pub fn date_ticks(value: &NaiveDate) -> Option<i64> {
    (i64::from(value.num_days_from_ce()) - 1).checked_mul(TICKS_PER_DAY)
}

/// Ticks since midnight.
pub fn time_ticks(value: &NaiveTime) -> i64 {
    // leap seconds carry nanos >= 1e9
    let nanos = i64::from(value.nanosecond()).min(999_999_999);
    i64::from(value.num_seconds_from_midnight()) * TICKS_PER_SECOND + nanos / NANOS_PER_TICK
}

/// Signed ticks of a duration, `None` when it does not fit in 64 bits.
pub fn timespan_ticks(value: &TimeDelta) -> Option<i64> {
    value
        .num_seconds()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(i64::from(value.subsec_nanos()) / NANOS_PER_TICK)
}
