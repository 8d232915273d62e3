//! Term production: classification, order-preserving encoding, scratch
//! buffers and compound terms.

pub mod classify;
pub mod compound;
pub mod encoder;
pub mod scratch;
pub mod ticks;

pub use classify::{Classified, ValueKind, classify};
pub use compound::{CompoundKeyBuilder, MAX_COMPONENT_LEN, split_compound_term};
pub use encoder::{
    Encoded, NUMERIC_TERM_LEN, TermEncoder, TermValue, decode_double_term, decode_integer_term,
};
pub use scratch::ScratchBuffer;
