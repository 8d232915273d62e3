//! Compound term assembly.
//!
//! A compound term packs two encoded field values into one term:
//!
//! ```text
//! [first component][second component][1 byte: length of first component]
//! ```
//!
//! Null and empty components contribute zero bytes, so a compound term whose
//! first component is null sorts before every term with a non-null first
//! component. The trailing length byte lets readers split the term back into
//! its components with [`split_compound_term`].

use log::{debug, trace};

use crate::document::value::Value;
use crate::error::{Result, TermsmithError};
use crate::schema::compound::CompoundFieldSpec;
use crate::schema::field::IndexField;
use crate::term::encoder::TermEncoder;
use crate::term::scratch::{DEFAULT_INITIAL_CAPACITY, ScratchBuffer};

/// Largest encoded size of a single compound component.
pub const MAX_COMPONENT_LEN: usize = u8::MAX as usize;

/// Assembles compound terms in a private scratch buffer.
#[derive(Debug)]
pub struct CompoundKeyBuilder {
    buffer: ScratchBuffer,
    max_term_length: usize,
}

impl CompoundKeyBuilder {
    pub fn new(max_term_length: usize, release_threshold: usize) -> Self {
        CompoundKeyBuilder {
            buffer: ScratchBuffer::with_limits(DEFAULT_INITIAL_CAPACITY, release_threshold),
            max_term_length,
        }
    }

    /// Largest compound term this builder produces.
    pub fn max_term_length(&self) -> usize {
        self.max_term_length
    }

    /// Allocated size of the scratch buffer.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Encode both components of `spec` and assemble the compound term.
    ///
    /// The returned slice stays valid until the next call.
    pub fn assemble(
        &mut self,
        spec: &CompoundFieldSpec,
        first: (&IndexField, &Value),
        second: (&IndexField, &Value),
        encoder: &mut TermEncoder,
    ) -> Result<&[u8]> {
        let first_len = self.encode_component(spec, first, encoder, 0)?;
        let second_len = self.encode_component(spec, second, encoder, first_len)?;

        let size = first_len + second_len + 1;
        if size > self.max_term_length {
            return Err(TermsmithError::CompoundTermTooLarge {
                compound: spec.to_string(),
                first: first.1.to_string(),
                second: second.1.to_string(),
                size,
                max: self.max_term_length,
            });
        }

        self.finish(first_len, second_len);
        trace!("assembled compound term {spec} ({size} bytes)");
        Ok(self.buffer.as_bytes())
    }

    /// Assemble a compound term from already encoded components.
    pub fn assemble_bytes(&mut self, name: &str, first: &[u8], second: &[u8]) -> Result<&[u8]> {
        if first.len() > MAX_COMPONENT_LEN {
            return Err(TermsmithError::invalid_compound_term(format!(
                "first component of {name} is {} bytes, the limit is {MAX_COMPONENT_LEN}",
                first.len()
            )));
        }
        let size = first.len() + second.len() + 1;
        if size > self.max_term_length {
            return Err(TermsmithError::CompoundTermTooLarge {
                compound: name.to_string(),
                first: String::from_utf8_lossy(first).into_owned(),
                second: String::from_utf8_lossy(second).into_owned(),
                size,
                max: self.max_term_length,
            });
        }

        self.buffer.write_at(0, first);
        self.buffer.write_at(first.len(), second);
        self.finish(first.len(), second.len());
        Ok(self.buffer.as_bytes())
    }

    /// Drop the scratch buffer if it grew past its release threshold.
    pub fn release(&mut self) -> bool {
        let before = self.buffer.capacity();
        let released = self.buffer.release_if_oversized();
        if released {
            debug!("released compound scratch buffer of {before} bytes");
        }
        released
    }

    fn encode_component(
        &mut self,
        spec: &CompoundFieldSpec,
        (field, value): (&IndexField, &Value),
        encoder: &mut TermEncoder,
        offset: usize,
    ) -> Result<usize> {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(TermsmithError::unsupported_value(
                &field.name,
                value.type_name(),
                format!("collections cannot be components of compound field {spec}"),
            ));
        }

        let encoded = encoder.encode(field, value, &mut self.buffer, offset)?;
        if encoded.len > MAX_COMPONENT_LEN {
            return Err(TermsmithError::ComponentTooLarge {
                compound: spec.to_string(),
                field: field.name.clone(),
                kind: encoded.kind.to_string(),
                size: encoded.len,
            });
        }
        Ok(encoded.len)
    }

    fn finish(&mut self, first_len: usize, second_len: usize) {
        let end = first_len + second_len;
        // first_len <= MAX_COMPONENT_LEN
        self.buffer.write_at(end, &[first_len as u8]);
        self.buffer.set_len(end + 1);
    }
}

/// Split a compound term into its two components.
pub fn split_compound_term(term: &[u8]) -> Result<(&[u8], &[u8])> {
    let Some((&first_len, components)) = term.split_last() else {
        return Err(TermsmithError::invalid_compound_term(
            "term is empty, expected at least the length byte",
        ));
    };
    let first_len = usize::from(first_len);
    if first_len > components.len() {
        return Err(TermsmithError::invalid_compound_term(format!(
            "first component length {first_len} exceeds the {} bytes of the term",
            components.len()
        )));
    }
    Ok(components.split_at(first_len))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, PerFieldAnalyzer};
    use crate::schema::field::FieldId;
    use crate::term::encoder::decode_integer_term;
    use crate::term::scratch::DEFAULT_RELEASE_THRESHOLD;

    fn encoder() -> TermEncoder {
        TermEncoder::new(Arc::new(PerFieldAnalyzer::new(Arc::new(
            KeywordAnalyzer::new(),
        ))))
    }

    fn builder() -> CompoundKeyBuilder {
        CompoundKeyBuilder::new(1024, DEFAULT_RELEASE_THRESHOLD)
    }

    fn fields() -> (IndexField, IndexField) {
        (
            IndexField::new(FieldId(1), "Year"),
            IndexField::new(FieldId(2), "Month"),
        )
    }

    #[test]
    fn test_two_integers() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let mut builder = builder();
        let mut encoder = encoder();

        let term = builder
            .assemble(
                &spec,
                (&year, &Value::I32(2021)),
                (&month, &Value::I32(3)),
                &mut encoder,
            )
            .unwrap()
            .to_vec();

        assert_eq!(term.len(), 17);
        assert_eq!(term[16], 8);
        let (first, second) = split_compound_term(&term).unwrap();
        assert_eq!(decode_integer_term(first), Some(2021));
        assert_eq!(decode_integer_term(second), Some(3));
    }

    #[test]
    fn test_null_first_component_sorts_first() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let mut builder = builder();
        let mut encoder = encoder();

        let null_first = builder
            .assemble(&spec, (&year, &Value::Null), (&month, &Value::I32(3)), &mut encoder)
            .unwrap()
            .to_vec();
        let set_first = builder
            .assemble(&spec, (&year, &Value::I32(i32::MIN)), (&month, &Value::I32(3)), &mut encoder)
            .unwrap()
            .to_vec();

        assert_eq!(null_first.len(), 9);
        assert_eq!(*null_first.last().unwrap(), 0);
        assert!(null_first < set_first);
    }

    #[test]
    fn test_component_too_large() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let long = "x".repeat(300);

        let mut builder = builder();
        let result = builder.assemble(
            &spec,
            (&year, &Value::from(long.as_str())),
            (&month, &Value::I32(3)),
            &mut encoder(),
        );
        match result {
            Err(TermsmithError::ComponentTooLarge { field, size, .. }) => {
                assert_eq!(field, "Year");
                assert_eq!(size, 300);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_compound_term_too_large() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let mut builder = CompoundKeyBuilder::new(16, DEFAULT_RELEASE_THRESHOLD);

        let result = builder.assemble(
            &spec,
            (&year, &Value::I32(2021)),
            (&month, &Value::I32(3)),
            &mut encoder(),
        );
        match result {
            Err(TermsmithError::CompoundTermTooLarge {
                size, max, first, ..
            }) => {
                assert_eq!(size, 17);
                assert_eq!(max, 16);
                assert_eq!(first, "2021");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_collections_are_rejected() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let mut builder = builder();
        let result = builder.assemble(
            &spec,
            (&year, &Value::Array(vec![Value::I32(1)])),
            (&month, &Value::I32(3)),
            &mut encoder(),
        );
        assert!(matches!(
            result,
            Err(TermsmithError::UnsupportedValueType { .. })
        ));
    }

    #[test]
    fn test_assemble_bytes_round_trip() {
        let mut builder = builder();
        let term = builder.assemble_bytes("[A, B]", b"abc", b"de").unwrap().to_vec();
        assert_eq!(term, b"abcde\x03");
        assert_eq!(split_compound_term(&term).unwrap(), (&b"abc"[..], &b"de"[..]));

        let empty = builder.assemble_bytes("[A, B]", b"", b"").unwrap().to_vec();
        assert_eq!(empty, vec![0]);
        assert_eq!(split_compound_term(&empty).unwrap(), (&b""[..], &b""[..]));
    }

    #[test]
    fn test_split_malformed() {
        assert!(matches!(
            split_compound_term(&[]),
            Err(TermsmithError::InvalidCompoundTerm(_))
        ));
        assert!(matches!(
            split_compound_term(&[1, 2, 5]),
            Err(TermsmithError::InvalidCompoundTerm(_))
        ));
    }

    #[test]
    fn test_release_after_large_term() {
        let spec = CompoundFieldSpec::new("Year", "Month");
        let (year, month) = fields();
        let mut builder = CompoundKeyBuilder::new(1024, 256);
        let mut encoder = encoder();
        let long = "x".repeat(200);

        builder
            .assemble(
                &spec,
                (&year, &Value::from(long.as_str())),
                (&month, &Value::from(long.as_str())),
                &mut encoder,
            )
            .unwrap();
        let peak = builder.capacity();
        assert!(peak > 256);
        assert!(builder.release());
        assert!(builder.capacity() < peak);
        assert!(!builder.release());
    }
}
