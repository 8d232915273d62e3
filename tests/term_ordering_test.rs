//! Byte order of encoded terms follows the order of the values.

use std::sync::Arc;

use chrono::NaiveDate;
use rand::Rng;
use termsmith::analysis::{KeywordAnalyzer, PerFieldAnalyzer};
use termsmith::document::Value;
use termsmith::error::Result;
use termsmith::schema::{CompoundFieldSpec, FieldId, IndexField};
use termsmith::term::{CompoundKeyBuilder, ScratchBuffer, TermEncoder, split_compound_term};

fn encoder() -> TermEncoder {
    TermEncoder::new(Arc::new(PerFieldAnalyzer::new(Arc::new(
        KeywordAnalyzer::new(),
    ))))
}

fn encode(encoder: &mut TermEncoder, value: &Value) -> Result<Vec<u8>> {
    let field = IndexField::new(FieldId(1), "Value");
    let mut buffer = ScratchBuffer::new();
    let encoded = encoder.encode(&field, value, &mut buffer, 0)?;
    Ok(buffer.region(0, encoded.len).to_vec())
}

#[test]
fn test_random_integers_sort_like_their_terms() -> Result<()> {
    let mut rng = rand::rng();
    let mut encoder = encoder();

    let mut values: Vec<i64> = (0..1000).map(|_| rng.random::<i64>()).collect();
    values.extend([i64::MIN, -1, 0, 1, i64::MAX]);

    let mut terms = Vec::with_capacity(values.len());
    for &v in &values {
        terms.push((encode(&mut encoder, &Value::I64(v))?, v));
    }
    terms.sort();
    values.sort();

    let by_term: Vec<i64> = terms.into_iter().map(|(_, v)| v).collect();
    assert_eq!(by_term, values);

    Ok(())
}

#[test]
fn test_random_doubles_sort_like_their_terms() -> Result<()> {
    let mut rng = rand::rng();
    let mut encoder = encoder();

    let mut values: Vec<f64> = (0..1000)
        .map(|_| rng.random_range(-1.0e12..1.0e12))
        .collect();
    values.extend([
        f64::NEG_INFINITY,
        f64::MIN,
        -1.0,
        -f64::MIN_POSITIVE,
        0.0,
        f64::MIN_POSITIVE,
        1.0,
        f64::MAX,
        f64::INFINITY,
    ]);

    let mut terms = Vec::with_capacity(values.len());
    for &v in &values {
        terms.push((encode(&mut encoder, &Value::F64(v))?, v));
    }
    terms.sort_by(|a, b| a.0.cmp(&b.0));
    values.sort_by(f64::total_cmp);

    let by_term: Vec<f64> = terms.into_iter().map(|(_, v)| v).collect();
    assert_eq!(by_term, values);

    Ok(())
}

#[test]
fn test_signed_zero_shares_a_term() -> Result<()> {
    let mut encoder = encoder();
    assert_eq!(
        encode(&mut encoder, &Value::F64(-0.0))?,
        encode(&mut encoder, &Value::F64(0.0))?
    );
    Ok(())
}

#[test]
fn test_dates_sort_chronologically() -> Result<()> {
    let mut encoder = encoder();
    let dates = [
        NaiveDate::from_ymd_opt(1, 1, 1),
        NaiveDate::from_ymd_opt(1999, 12, 31),
        NaiveDate::from_ymd_opt(2021, 1, 1),
        NaiveDate::from_ymd_opt(2021, 1, 2),
    ];

    let mut previous: Option<Vec<u8>> = None;
    for date in dates.into_iter().flatten() {
        let term = encode(&mut encoder, &Value::Date(date))?;
        if let Some(previous) = &previous {
            assert!(previous < &term, "{date} did not sort after its predecessor");
        }
        previous = Some(term);
    }

    Ok(())
}

#[test]
fn test_compound_terms_with_equal_first_component_sort_by_second() -> Result<()> {
    let mut rng = rand::rng();
    let mut encoder = encoder();
    let mut builder = CompoundKeyBuilder::new(1024, 64 * 1024);
    let spec = CompoundFieldSpec::new("Year", "Month");
    let year = IndexField::new(FieldId(1), "Year");
    let month = IndexField::new(FieldId(2), "Month");

    let mut months: Vec<i64> = (0..100).map(|_| rng.random_range(-500..500)).collect();
    let mut terms = Vec::with_capacity(months.len());
    for &m in &months {
        let term = builder
            .assemble(
                &spec,
                (&year, &Value::I64(2021)),
                (&month, &Value::I64(m)),
                &mut encoder,
            )?
            .to_vec();
        terms.push((term, m));
    }
    terms.sort();
    months.sort();

    assert_eq!(terms.iter().map(|(_, m)| *m).collect::<Vec<_>>(), months);
    for (term, _) in &terms {
        let (first, second) = split_compound_term(term)?;
        assert_eq!(first.len(), 8);
        assert_eq!(second.len(), 8);
    }

    Ok(())
}

#[test]
fn test_null_sorts_before_everything() -> Result<()> {
    let mut encoder = encoder();
    let null = encode(&mut encoder, &Value::Null)?;
    assert!(null.is_empty());

    for value in [Value::I64(i64::MIN), Value::F64(f64::NEG_INFINITY), Value::from("a")] {
        assert!(null < encode(&mut encoder, &value)?);
    }

    Ok(())
}
