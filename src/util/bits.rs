//! Bit-level conversions behind the order-preserving term encodings.
//!
//! Every numeric term is written as an unsigned, big-endian 64-bit word whose
//! byte-lexicographic order equals the natural order of the source value:
//!
//! ```text
//! i64  ──flip sign bit──┐
//!                       ├──> u64 ──reverse bytes (big-endian)──> [u8; 8]
//! f64  ──sortable bits──┘
//! ```
//!
//! Integer terms are therefore not the raw big-endian two's-complement
//! bytes of the value: the sign bit is flipped first so that negative
//! numbers sort before positive ones. Readers must undo the flip
//! ([`sortable_to_i64`]) after reading the word back.
//!
//! The functions here replace raw memory reinterpretation with explicit,
//! tested bit manipulation so the byte order contract is the same on every
//! platform.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The sign bit of a 64-bit word.
pub const SIGN_BIT: u64 = 1 << 63;

/// Map a signed integer onto the unsigned line so that `a < b` implies
/// `sortable_i64(a) < sortable_i64(b)`.
#[inline]
pub fn sortable_i64(value: i64) -> u64 {
    (value as u64) ^ SIGN_BIT
}

/// Inverse of [`sortable_i64`].
#[inline]
pub fn sortable_to_i64(sortable: u64) -> i64 {
    (sortable ^ SIGN_BIT) as i64
}

/// Transform the IEEE-754 bits of `value` into an unsigned word that sorts
/// in the numeric order of the double.
///
/// Negative numbers have every bit inverted; non-negative numbers get the
/// sign bit set. Callers are responsible for rejecting NaN and for
/// normalising `-0.0` first (see [`normalize_double`]).
#[inline]
pub fn double_to_sortable_u64(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & SIGN_BIT != 0 {
        !bits
    } else {
        bits | SIGN_BIT
    }
}

/// Inverse of [`double_to_sortable_u64`].
#[inline]
pub fn sortable_u64_to_double(sortable: u64) -> f64 {
    let bits = if sortable & SIGN_BIT != 0 {
        sortable & !SIGN_BIT
    } else {
        !sortable
    };
    f64::from_bits(bits)
}

/// Fold `-0.0` onto `0.0`. Returns `None` for NaN, which has no position in
/// the numeric order.
#[inline]
pub fn normalize_double(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else if value == 0.0 {
        Some(0.0)
    } else {
        Some(value)
    }
}

/// Write `value` most significant byte first into the first 8 bytes of `out`.
///
/// # Panics
///
/// Panics if `out` is shorter than 8 bytes.
#[inline]
pub fn write_u64_be(out: &mut [u8], value: u64) {
    BigEndian::write_u64(out, value);
}

/// Read a word written by [`write_u64_be`].
#[inline]
pub fn read_u64_be(bytes: &[u8]) -> u64 {
    BigEndian::read_u64(bytes)
}

/// The raw bytes of a UTF-16 code unit: one byte when the high byte is zero,
/// otherwise both bytes, low byte first.
///
/// Returns the byte array and the number of meaningful bytes in it.
#[inline]
pub fn code_unit_bytes(unit: u16) -> ([u8; 2], usize) {
    let mut bytes = [0u8; 2];
    LittleEndian::write_u16(&mut bytes, unit);
    if bytes[1] == 0 {
        (bytes, 1)
    } else {
        (bytes, 2)
    }
}

/// Smallest power of two greater than or equal to `value` (1 for 0).
#[inline]
pub fn next_power_of_two(value: usize) -> usize {
    value.max(1).next_power_of_two()
}
